//! The layered extraction engine.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::extract::recover::scrape_pairs;
use crate::extract::shape::Shape;
use crate::extract::span;

/// Key injected into array elements that carry no position.
pub const POSITION_KEY: &str = "timestamp";
/// Key injected into array elements to mark them as model output.
pub const GENERATED_KEY: &str = "is_generated";
/// Spacing between injected positions.
pub const POSITION_STEP: u64 = 10;

const DEVANAGARI_KEY: &str = r#"\{\s*"[\x{0900}-\x{097F}]+"\s*:"#;

// ---------------------------------------------------------------------------
// Strategy / Extraction
// ---------------------------------------------------------------------------

/// Which recovery step produced a parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Interior of a ```json fence.
    FencedBlock,
    /// Discriminated opener, bracket-balanced to its closer.
    BalancedScan,
    /// First opener to last closer.
    WidestSpan,
    /// The whole response text.
    WholeText,
    /// Leading complete elements of a truncated array.
    TruncatedArray,
    /// Regex scrape of Devanagari key/value pairs.
    PairScrape,
}

/// Outcome of an extraction.  `Empty` is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Parsed { value: Value, strategy: Strategy },
    Empty,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::Empty)
    }

    /// The step that succeeded, if any.
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            Extraction::Parsed { strategy, .. } => Some(*strategy),
            Extraction::Empty => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Extraction::Parsed { value, .. } => Some(value),
            Extraction::Empty => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Extraction::Parsed { value, .. } => Some(value),
            Extraction::Empty => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Locates, repairs and parses a JSON payload embedded in model output.
///
/// Candidate spans are tried in order; the first that parses (strictly, or
/// after trailing-comma repair) *and* conforms to the shape wins:
///
/// 1. ```json fenced block interior
/// 2. discriminated opener scanned to its balanced closer
/// 3. first opener … last closer
/// 4. the whole text
/// 5. (`ObjectArray`) complete elements of a truncated array
/// 6. (`StringMap`) regex scrape of Devanagari pairs
///
/// # Example
/// ```rust
/// use hindi_learn::extract::{Extractor, Shape};
///
/// let extractor = Extractor::new(Shape::ObjectArray).lead_key("hindi");
/// let out = extractor.extract(r#"here is data: [{"hindi":"नमस्ते","english":"Hello"}] thanks"#);
/// let items = out.value().unwrap().as_array().unwrap();
/// assert_eq!(items[0]["english"], "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    shape: Shape,
    lead_key: Option<String>,
    discriminator: Option<Regex>,
}

impl Extractor {
    pub fn new(shape: Shape) -> Self {
        let mut extractor = Self {
            shape,
            lead_key: None,
            discriminator: None,
        };
        extractor.discriminator = extractor.build_discriminator();
        extractor
    }

    /// Expect `key` as the first field of the (first) object.
    ///
    /// Ignored for [`Shape::StringMap`], whose discriminator is a Devanagari key.
    pub fn lead_key(mut self, key: &str) -> Self {
        self.lead_key = Some(key.to_string());
        self.discriminator = self.build_discriminator();
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Run every recovery step against `raw`.  Never panics, never errors.
    pub fn extract(&self, raw: &str) -> Extraction {
        let (open, close) = self.shape.brackets();

        let mut candidates: Vec<(Strategy, &str)> = Vec::with_capacity(4);
        if let Some(s) = span::fenced_json(raw) {
            candidates.push((Strategy::FencedBlock, s));
        }
        if let Some(s) = self
            .discriminator
            .as_ref()
            .and_then(|re| span::discriminated_span(raw, re, open, close))
        {
            candidates.push((Strategy::BalancedScan, s));
        }
        if let Some(s) = span::widest_span(raw, open, close) {
            candidates.push((Strategy::WidestSpan, s));
        }
        candidates.push((Strategy::WholeText, raw.trim()));

        for (strategy, candidate) in candidates {
            if let Some(value) = self.parse_candidate(candidate) {
                log::debug!("extracted {:?} via {:?}", self.shape, strategy);
                return self.finish(value, strategy);
            }
        }

        if self.shape == Shape::ObjectArray {
            if let Some(value) = self
                .array_start(raw)
                .and_then(|start| span::truncated_array(raw, start))
                .and_then(|salvaged| self.parse_candidate(&salvaged))
            {
                log::warn!("extracted truncated array; trailing elements dropped");
                return self.finish(value, Strategy::TruncatedArray);
            }
        }

        if self.shape == Shape::StringMap {
            if let Some(map) = scrape_pairs(raw) {
                log::warn!("JSON parse failed; recovered {} pairs by regex", map.len());
                return Extraction::Parsed {
                    value: Value::Object(map),
                    strategy: Strategy::PairScrape,
                };
            }
        }

        log::warn!(
            "no {:?} payload found in response ({} chars)",
            self.shape,
            raw.len()
        );
        Extraction::Empty
    }

    /// Extract and deserialize into `T`.
    ///
    /// A payload that parses as JSON but does not fit `T` yields `None`.
    pub fn extract_as<T: DeserializeOwned>(&self, raw: &str) -> Option<T> {
        let value = self.extract(raw).into_value()?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                log::warn!("extracted {:?} did not match schema: {e}", self.shape);
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn build_discriminator(&self) -> Option<Regex> {
        let pattern = match (self.shape, self.lead_key.as_deref()) {
            (Shape::StringMap, _) => DEVANAGARI_KEY.to_string(),
            (Shape::ObjectArray, Some(key)) => {
                format!(r#"\[\s*\{{\s*"{}""#, regex::escape(key))
            }
            (Shape::ObjectArray, None) => r"\[\s*\{".to_string(),
            (Shape::Object, Some(key)) => format!(r#"\{{\s*"{}""#, regex::escape(key)),
            (Shape::Object, None) => r#"\{\s*""#.to_string(),
        };
        match Regex::new(&pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("discriminator pattern rejected ({e}); balanced scan disabled");
                None
            }
        }
    }

    /// Offset of the array a truncated response most likely started.
    fn array_start(&self, raw: &str) -> Option<usize> {
        self.discriminator
            .as_ref()
            .and_then(|re| re.find(raw))
            .map(|m| m.start())
            .or_else(|| raw.find('['))
    }

    fn parse_candidate(&self, candidate: &str) -> Option<Value> {
        let parsed = serde_json::from_str::<Value>(candidate).or_else(|_| {
            let repaired = span::strip_trailing_commas(candidate);
            serde_json::from_str::<Value>(&repaired)
        });
        match parsed {
            Ok(value) if self.shape.matches(&value) => Some(value),
            _ => None,
        }
    }

    fn finish(&self, mut value: Value, strategy: Strategy) -> Extraction {
        if let Value::Array(items) = &mut value {
            tag_elements(items);
        }
        Extraction::Parsed { value, strategy }
    }
}

/// Inject position and generated markers into elements lacking them.
fn tag_elements(items: &mut [Value]) {
    for (i, item) in items.iter_mut().enumerate() {
        if let Value::Object(obj) = item {
            obj.entry(POSITION_KEY)
                .or_insert_with(|| Value::from(i as u64 * POSITION_STEP));
            obj.entry(GENERATED_KEY).or_insert(Value::Bool(true));
        }
    }
}

/// Convenience wrapper: extract `shape` from `raw` with no lead key.
pub fn extract(raw: &str, shape: Shape) -> Extraction {
    Extractor::new(shape).extract(raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs_extractor() -> Extractor {
        Extractor::new(Shape::ObjectArray).lead_key("hindi")
    }

    #[test]
    fn fenced_block_wins() {
        let raw = "Here you go:\n```json\n[{\"hindi\": \"नमस्ते\", \"english\": \"Hello\"}]\n```\n";
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::FencedBlock));
        assert_eq!(out.value().unwrap()[0]["english"], "Hello");
    }

    #[test]
    fn embedded_array_in_prose() {
        let raw = r#"here is data: [{"hindi":"नमस्ते","english":"Hello"}] thanks"#;
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::BalancedScan));
        let items = out.value().unwrap().as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["hindi"], "नमस्ते");
        assert_eq!(items[0]["english"], "Hello");
    }

    #[test]
    fn balanced_scan_ignores_later_brackets() {
        let raw = r#"Pairs: [{"hindi": "हाँ", "english": "Yes", "notes": {"x": [1, 2]}}] and also [see above]."#;
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::BalancedScan));
        assert_eq!(out.value().unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn widest_span_when_no_discriminator_match() {
        let raw = r#"Result -> [ {"english": "Yes", "hindi": "हाँ"} ] <-"#;
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::WidestSpan));
    }

    #[test]
    fn whole_text_when_already_clean() {
        let out = extract(r#"{"title": "Quiz"}"#, Shape::Object);
        assert!(matches!(
            out.strategy(),
            Some(Strategy::BalancedScan) | Some(Strategy::WidestSpan) | Some(Strategy::WholeText)
        ));
        assert_eq!(out.value().unwrap()["title"], "Quiz");
    }

    #[test]
    fn clean_input_is_reproduced_with_tags_only_where_absent() {
        let original = json!([
            {"hindi": "नमस्ते", "english": "Hello", "timestamp": 3, "is_generated": false},
            {"hindi": "धन्यवाद", "english": "Thank you"}
        ]);
        let raw = serde_json::to_string(&original).unwrap();
        let out = pairs_extractor().extract(&raw).into_value().unwrap();

        assert_eq!(out[0], original[0]);
        assert_eq!(out[1]["hindi"], "धन्यवाद");
        assert_eq!(out[1]["timestamp"], 10);
        assert_eq!(out[1]["is_generated"], true);
    }

    #[test]
    fn clean_string_map_round_trips() {
        let original = json!({"नमस्ते": "Hello", "पानी": "Water"});
        let raw = serde_json::to_string(&original).unwrap();
        let out = extract(&raw, Shape::StringMap).into_value().unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn trailing_commas_are_repaired() {
        let raw = "```json\n[{\"hindi\": \"हाँ\", \"english\": \"Yes\",},]\n```";
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::FencedBlock));
        assert_eq!(out.value().unwrap()[0]["english"], "Yes");
    }

    #[test]
    fn truncated_array_salvages_complete_elements() {
        let raw = r#"```json
[
  {"hindi": "नमस्ते", "english": "Hello"},
  {"hindi": "धन्यवाद", "english": "Thank you"},
  {"hindi": "पा"#;
        let out = pairs_extractor().extract(raw);
        assert_eq!(out.strategy(), Some(Strategy::TruncatedArray));
        assert_eq!(out.value().unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn vocabulary_regex_recovery() {
        let raw = r#""नमस्ते": "Hello", "धन्यवाद": "Thank you""#;
        let out = extract(raw, Shape::StringMap);
        assert_eq!(out.strategy(), Some(Strategy::PairScrape));
        let map = out.value().unwrap().as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["नमस्ते"], "Hello");
        assert_eq!(map["धन्यवाद"], "Thank you");
    }

    #[test]
    fn vocabulary_discriminator_skips_latin_object() {
        let raw = r#"Meta {"count": 2} then {"नमस्ते": "Hello", "आप": "You"} done"#;
        let out = extract(raw, Shape::StringMap);
        assert_eq!(out.strategy(), Some(Strategy::BalancedScan));
        assert_eq!(out.value().unwrap()["आप"], "You");
    }

    #[test]
    fn non_map_shapes_return_empty_on_garbage() {
        let canned = "नमस्ते! मैं आपकी मदद कैसे कर सकता हूँ? (Hello! How can I help you?)";
        assert!(pairs_extractor().extract(canned).is_empty());
        assert!(extract(canned, Shape::Object).is_empty());
        assert!(extract("", Shape::ObjectArray).is_empty());
    }

    #[test]
    fn string_map_empty_when_nothing_to_scrape() {
        assert!(extract("no pairs here {", Shape::StringMap).is_empty());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        // An object where an array is expected must not be accepted.
        assert!(extract(r#"{"hindi": "हाँ"}"#, Shape::ObjectArray).is_empty());
    }

    #[test]
    fn extract_as_maps_schema_mismatch_to_none() {
        #[derive(serde::Deserialize)]
        struct Pair {
            #[allow(dead_code)]
            hindi: String,
        }
        let extractor = pairs_extractor();
        let ok: Option<Vec<Pair>> = extractor.extract_as(r#"[{"hindi": "हाँ"}]"#);
        assert_eq!(ok.map(|v| v.len()), Some(1));

        let bad: Option<Vec<Pair>> = extractor.extract_as(r#"[{"english": "Yes"}]"#);
        assert!(bad.is_none());
    }

    #[test]
    fn lead_key_is_regex_escaped() {
        let extractor = Extractor::new(Shape::Object).lead_key("a.b(");
        let out = extractor.extract(r#"x {"a.b(": 1} y"#);
        assert_eq!(out.strategy(), Some(Strategy::BalancedScan));
    }
}
