//! Expected top-level JSON shapes.

use serde_json::Value;

/// The top-level structure an extraction must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `[ {..}, {..} ]`, every element an object.
    ObjectArray,
    /// `{ "शब्द": "word", .. }`, every value a string.
    StringMap,
    /// Any JSON object.
    Object,
}

impl Shape {
    /// Opening and closing bracket of this shape.
    pub fn brackets(self) -> (char, char) {
        match self {
            Shape::ObjectArray => ('[', ']'),
            Shape::StringMap | Shape::Object => ('{', '}'),
        }
    }

    /// `true` when `value` conforms to this shape.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Shape::ObjectArray, Value::Array(items)) => items.iter().all(Value::is_object),
            (Shape::StringMap, Value::Object(map)) => map.values().all(Value::is_string),
            (Shape::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_array_rejects_scalars() {
        assert!(Shape::ObjectArray.matches(&json!([{"a": 1}, {}])));
        assert!(!Shape::ObjectArray.matches(&json!([{"a": 1}, 2])));
        assert!(!Shape::ObjectArray.matches(&json!({"a": 1})));
    }

    #[test]
    fn string_map_requires_string_values() {
        assert!(Shape::StringMap.matches(&json!({"नमस्ते": "Hello"})));
        assert!(!Shape::StringMap.matches(&json!({"count": 2})));
        assert!(Shape::Object.matches(&json!({"count": 2})));
    }
}
