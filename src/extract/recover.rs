//! Last-resort recovery of `"<Hindi word>": "<meaning>"` pairs.
//!
//! Used only for [`Shape::StringMap`](super::Shape::StringMap) when no
//! candidate span parsed.  Bypasses JSON entirely, so it survives missing
//! braces, stray prose between pairs and truncated tails.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

fn devanagari_pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""([\x{0900}-\x{097F}]+)"\s*:\s*"((?:[^"\\]|\\.)+)""#)
            .expect("static Devanagari pair pattern")
    })
}

/// Scrape every quoted-Devanagari-key / quoted-value pair from `raw`.
///
/// Later duplicates overwrite earlier ones.  Returns `None` when nothing
/// was found.
pub fn scrape_pairs(raw: &str) -> Option<Map<String, Value>> {
    let mut map = Map::new();
    for caps in devanagari_pair_re().captures_iter(raw) {
        map.insert(caps[1].to_string(), Value::String(unescape(&caps[2])));
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Decode JSON string escapes; a value with a broken escape is kept as is.
fn unescape(value: &str) -> String {
    serde_json::from_str(&format!("\"{value}\"")).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_pairs_without_braces() {
        let map = scrape_pairs(r#""नमस्ते": "Hello", "धन्यवाद": "Thank you""#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["नमस्ते"], "Hello");
        assert_eq!(map["धन्यवाद"], "Thank you");
    }

    #[test]
    fn last_write_wins() {
        let map = scrape_pairs(r#""आप": "you" ... "आप": "You (formal)""#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["आप"], "You (formal)");
    }

    #[test]
    fn escaped_quotes_stay_inside_the_value() {
        let map = scrape_pairs(r#""नमस्ते": "Say \"hi\"", "पानी": "Water\nDrink""#).unwrap();
        assert_eq!(map["नमस्ते"], "Say \"hi\"");
        assert_eq!(map["पानी"], "Water\nDrink");
    }

    #[test]
    fn broken_escape_is_kept_verbatim() {
        let map = scrape_pairs(r#""घर": "House \q""#).unwrap();
        assert_eq!(map["घर"], r"House \q");
    }

    #[test]
    fn latin_keys_are_ignored() {
        assert!(scrape_pairs(r#""hello": "नमस्ते""#).is_none());
    }
}
