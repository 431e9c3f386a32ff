//! Retrieval over extracted learning content.
//!
//! # Architecture
//!
//! ```text
//! StructuredContent ──▶ Indexable::document / metadata ──▶ SimilarityIndex (trait)
//!                                                             │  MemoryIndex
//!                                                             │  (hashed trigrams,
//!                                                             │   cosine distance)
//! query text ──▶ KnowledgeStore::query ◀──────────────────────┘
//!                   │
//!                   ├─▶ RetrievalResult::Hits        (ranked, ≤ n_results)
//!                   └─▶ RetrievalResult::Unavailable (index failure)
//! ```

pub mod document;
pub mod index;
pub mod store;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use document::{Indexable, RecordType, UnknownRecordType, TYPE_KEY};
pub use index::{
    cosine_distance, HashingEmbedder, IndexError, MemoryIndex, Metadata, QueryHits,
    SimilarityIndex,
};
pub use store::{IndexedCounts, KnowledgeStore, RetrievalResult, RetrievedDocument, StoreError};
