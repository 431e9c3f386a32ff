//! Candidate-span location inside free-form model output.
//!
//! Each function isolates one slice of `text` that *might* be the JSON
//! payload.  None of them parse; [`Extractor`](super::Extractor) decides
//! which candidate wins.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("static fenced-block pattern")
    })
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[\]}])").expect("static trailing-comma pattern"))
}

/// Interior of the first fenced block labelled `json`.
pub fn fenced_json(text: &str) -> Option<&str> {
    fenced_json_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Span from the opener at byte offset `start` to its matching closer.
///
/// The scan ignores brackets inside string literals and honours `\"`
/// escapes.  Returns `None` when the opener is never closed.
pub fn balanced_from(text: &str, start: usize, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + i + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Balanced span starting at the first match of `discriminator`.
///
/// The discriminator must match starting *at* the opener, so the match start
/// is the opener's offset.
pub fn discriminated_span<'a>(
    text: &'a str,
    discriminator: &Regex,
    open: char,
    close: char,
) -> Option<&'a str> {
    let m = discriminator.find(text)?;
    balanced_from(text, m.start(), open, close)
}

/// First `open` to last `close` anywhere in the text.
pub fn widest_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(&text[start..end + close.len_utf8()])
    } else {
        None
    }
}

/// Salvage the complete leading elements of a truncated array of objects.
///
/// Starting at the `[` at byte offset `start`, keeps every object element
/// that was fully closed and appends the missing `]`.  Returns `None` when
/// the array is actually complete or no element was ever closed.
pub fn truncated_array(text: &str, start: usize) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut last_element_end = None;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    // Array closed normally; nothing to salvage.
                    return None;
                }
                if depth == 1 && c == '}' {
                    last_element_end = Some(start + i + 1);
                }
            }
            _ => {}
        }
    }

    last_element_end.map(|end| format!("{}]", &text[start..end]))
}

/// Remove commas that directly precede a closing bracket.
pub fn strip_trailing_commas(span: &str) -> Cow<'_, str> {
    trailing_comma_re().replace_all(span, "$1")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
