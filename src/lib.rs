//! Hindi learning content pipeline.
//!
//! Raw transcripts go in; structured phrase pairs, dialogues and vocabulary
//! come out, and feed retrieval-grounded answers and interactive exercises.
//!
//! ```text
//! transcript ─▶ content::TranscriptProcessor ─▶ StructuredContent (JSON)
//!                      │ llm::ResponseGenerator        │
//!                      │ extract::Extractor            ├─▶ knowledge::KnowledgeStore
//!                                                      └─▶ practice::{Dialogue,Quiz,Listening}Generator
//! ```

pub mod config;
pub mod content;
pub mod extract;
pub mod knowledge;
pub mod llm;
pub mod practice;
