//! Structured extraction from free-text model output.
//!
//! Model responses are untrusted: the JSON we asked for may be wrapped in
//! prose, fenced or not, carry trailing commas, or be cut off mid-element.
//! [`Extractor`] isolates and parses the payload through an ordered list of
//! increasingly lenient strategies and reports either
//! [`Extraction::Parsed`] or [`Extraction::Empty`]; it never returns an
//! error and never panics.
//!
//! ```text
//! raw text ─▶ fenced ```json ─▶ balanced scan ─▶ widest span ─▶ whole text
//!                                                   │
//!                    (arrays) truncated salvage ◀───┤
//!                    (maps)   regex pair scrape ◀───┘ ─▶ Empty
//! ```

pub mod extractor;
pub mod recover;
pub mod shape;
pub mod span;

pub use extractor::{
    extract, Extraction, Extractor, Strategy, GENERATED_KEY, POSITION_KEY, POSITION_STEP,
};
pub use shape::Shape;
