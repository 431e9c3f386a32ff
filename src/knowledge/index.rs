//! Similarity index seam and the in-memory implementation.
//!
//! [`SimilarityIndex`] mirrors the column-oriented interface of common
//! embedding stores: parallel `ids` / `documents` / `metadatas` on write,
//! one result row per query text on read.  [`MemoryIndex`] embeds text
//! with [`HashingEmbedder`] and ranks by cosine distance.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use thiserror::Error;

/// Per-document key/value metadata.
pub type Metadata = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// IndexError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// `ids`, `documents` and `metadatas` differ in length.
    #[error("Column length mismatch: {ids} ids, {documents} documents, {metadatas} metadatas")]
    LengthMismatch {
        ids: usize,
        documents: usize,
        metadatas: usize,
    },

    /// The underlying store failed.
    #[error("Index backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// QueryHits
// ---------------------------------------------------------------------------

/// Query results; the outer vectors have one entry per query text and the
/// inner vectors are ranked by ascending distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryHits {
    pub ids: Vec<Vec<String>>,
    pub documents: Vec<Vec<String>>,
    pub metadatas: Vec<Vec<Metadata>>,
    pub distances: Vec<Vec<f32>>,
}

// ---------------------------------------------------------------------------
// SimilarityIndex trait
// ---------------------------------------------------------------------------

/// A store of documents searchable by text similarity.
pub trait SimilarityIndex: Send + Sync {
    /// Insert documents, replacing any existing entry with the same id.
    fn upsert(
        &mut self,
        ids: &[String],
        documents: &[String],
        metadatas: &[Metadata],
    ) -> Result<(), IndexError>;

    /// The `n_results` nearest documents to each of `texts`.
    ///
    /// When `filter` is given only documents whose metadata contains every
    /// key/value pair of `filter` are considered.
    fn query(
        &self,
        texts: &[String],
        n_results: usize,
        filter: Option<&Metadata>,
    ) -> Result<QueryHits, IndexError>;

    /// Number of stored documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// HashingEmbedder
// ---------------------------------------------------------------------------

/// Feature-hashing text embedder over character trigrams and whole words.
///
/// Deterministic, dependency-free and script-agnostic, so Devanagari and
/// Latin text embed the same way.  Output vectors are L2-normalised.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMS: usize = 512;

    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dims];
        let lowered = text.to_lowercase();

        for word in lowered.split_whitespace() {
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();
            for gram in padded.windows(3) {
                v[self.bucket(gram.iter().copied())] += 1.0;
            }
            // Whole words weigh more than any single trigram.
            v[self.bucket(word.chars())] += 2.0;
        }

        normalize(&mut v);
        v
    }

    fn bucket(&self, chars: impl Iterator<Item = char>) -> usize {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for c in chars {
            for byte in (c as u32).to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        (hash % self.dims as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMS)
    }
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v {
            *x /= norm;
        }
    }
}

/// `1 - cos(a, b)` for L2-normalised vectors; `1.0` when either is zero.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (1.0 - dot).clamp(0.0, 2.0)
}

// ---------------------------------------------------------------------------
// MemoryIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    document: String,
    metadata: Metadata,
    vector: Vec<f32>,
}

/// In-process [`SimilarityIndex`]; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    embedder: HashingEmbedder,
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedder(embedder: HashingEmbedder) -> Self {
        Self {
            embedder,
            ..Self::default()
        }
    }
}

fn metadata_matches(metadata: &Metadata, filter: &Metadata) -> bool {
    filter
        .iter()
        .all(|(key, expected)| metadata.get(key) == Some(expected))
}

impl SimilarityIndex for MemoryIndex {
    fn upsert(
        &mut self,
        ids: &[String],
        documents: &[String],
        metadatas: &[Metadata],
    ) -> Result<(), IndexError> {
        if ids.len() != documents.len() || ids.len() != metadatas.len() {
            return Err(IndexError::LengthMismatch {
                ids: ids.len(),
                documents: documents.len(),
                metadatas: metadatas.len(),
            });
        }

        for ((id, document), metadata) in ids.iter().zip(documents).zip(metadatas) {
            let entry = Entry {
                id: id.clone(),
                document: document.clone(),
                metadata: metadata.clone(),
                vector: self.embedder.embed(document),
            };
            match self.positions.get(id) {
                Some(&pos) => self.entries[pos] = entry,
                None => {
                    self.positions.insert(id.clone(), self.entries.len());
                    self.entries.push(entry);
                }
            }
        }
        Ok(())
    }

    fn query(
        &self,
        texts: &[String],
        n_results: usize,
        filter: Option<&Metadata>,
    ) -> Result<QueryHits, IndexError> {
        let mut hits = QueryHits::default();

        for text in texts {
            let query = self.embedder.embed(text);
            let mut ranked: Vec<(f32, &Entry)> = self
                .entries
                .iter()
                .filter(|e| filter.map_or(true, |f| metadata_matches(&e.metadata, f)))
                .map(|e| (cosine_distance(&query, &e.vector), e))
                .collect();
            // Stable: equal distances keep insertion order.
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
            ranked.truncate(n_results);

            hits.ids.push(ranked.iter().map(|(_, e)| e.id.clone()).collect());
            hits.documents
                .push(ranked.iter().map(|(_, e)| e.document.clone()).collect());
            hits.metadatas
                .push(ranked.iter().map(|(_, e)| e.metadata.clone()).collect());
            hits.distances.push(ranked.iter().map(|(d, _)| *d).collect());
        }
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(kind: &str) -> Metadata {
        Metadata::from([("type".to_string(), Value::from(kind))])
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn embedding_is_normalised_and_deterministic() {
        let e = HashingEmbedder::default();
        let a = e.embed("नमस्ते दोस्तों");
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
        assert_eq!(a, e.embed("नमस्ते दोस्तों"));
        assert!(e.embed("   ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn identical_text_has_zero_distance() {
        let e = HashingEmbedder::default();
        let a = e.embed("Hindi: पानी");
        assert!(cosine_distance(&a, &a) < 1e-4);
        assert_eq!(cosine_distance(&a, &e.embed("")), 1.0);
    }

    #[test]
    fn nearest_document_ranks_first() {
        let mut index = MemoryIndex::new();
        index
            .upsert(
                &strings(&["a", "b", "c"]),
                &strings(&[
                    "Hindi word: पानी\nEnglish meaning: Water",
                    "Hindi word: खाना\nEnglish meaning: Food",
                    "Hindi: नमस्ते\nEnglish: Hello",
                ]),
                &[meta("vocabulary"), meta("vocabulary"), meta("language_pair")],
            )
            .unwrap();

        let hits = index.query(&strings(&["water पानी"]), 2, None).unwrap();
        assert_eq!(hits.ids[0][0], "a");
        assert_eq!(hits.ids[0].len(), 2);
        assert!(hits.distances[0].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn filter_restricts_candidates() {
        let mut index = MemoryIndex::new();
        index
            .upsert(
                &strings(&["a", "b"]),
                &strings(&["Hello", "Hello there"]),
                &[meta("vocabulary"), meta("dialogue")],
            )
            .unwrap();

        let hits = index
            .query(&strings(&["Hello"]), 5, Some(&meta("dialogue")))
            .unwrap();
        assert_eq!(hits.ids[0], ["b"]);
    }

    #[test]
    fn upsert_replaces_existing_id() {
        let mut index = MemoryIndex::new();
        index
            .upsert(&strings(&["x"]), &strings(&["old"]), &[meta("vocabulary")])
            .unwrap();
        index
            .upsert(&strings(&["x"]), &strings(&["new"]), &[meta("vocabulary")])
            .unwrap();

        assert_eq!(index.len(), 1);
        let hits = index.query(&strings(&["new"]), 1, None).unwrap();
        assert_eq!(hits.documents[0], ["new"]);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let mut index = MemoryIndex::new();
        let err = index
            .upsert(&strings(&["x", "y"]), &strings(&["one"]), &[])
            .unwrap_err();
        assert!(matches!(err, IndexError::LengthMismatch { ids: 2, .. }));
        assert!(index.is_empty());
    }
}
