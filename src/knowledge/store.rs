//! Knowledge store: structured content in, ranked context out.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::content::{vocabulary_entries, ContentError, StructuredContent};
use crate::knowledge::document::{Indexable, RecordType, TYPE_KEY};
use crate::knowledge::index::{IndexError, MemoryIndex, Metadata, SimilarityIndex};

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// A single retrieved document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    pub distance: f32,
}

impl RetrievedDocument {
    pub fn record_type(&self) -> Option<RecordType> {
        self.metadata
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// Outcome of a query.  Index failures are reported, not raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalResult {
    /// Ranked by ascending distance.
    Hits(Vec<RetrievedDocument>),
    Unavailable { error: String },
}

impl RetrievalResult {
    /// The hits, or an empty slice when the index was unavailable.
    pub fn documents(&self) -> &[RetrievedDocument] {
        match self {
            RetrievalResult::Hits(docs) => docs,
            RetrievalResult::Unavailable { .. } => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, RetrievalResult::Unavailable { .. })
    }
}

/// Number of records indexed per type by [`KnowledgeStore::add_structured`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexedCounts {
    pub language_pairs: usize,
    pub dialogues: usize,
    pub vocabulary: usize,
}

impl IndexedCounts {
    pub fn total(&self) -> usize {
        self.language_pairs + self.dialogues + self.vocabulary
    }
}

// ---------------------------------------------------------------------------
// KnowledgeStore
// ---------------------------------------------------------------------------

/// Similarity-searchable store of learning content.
///
/// # Example
/// ```rust
/// use hindi_learn::content::LanguagePair;
/// use hindi_learn::knowledge::{KnowledgeStore, RecordType};
///
/// let mut store = KnowledgeStore::in_memory();
/// store.upsert(&[LanguagePair::new("पानी चाहिए", "I need water", 0.0)]).unwrap();
///
/// let result = store.query("water", 3, Some(RecordType::LanguagePair));
/// assert_eq!(result.documents().len(), 1);
/// ```
pub struct KnowledgeStore {
    index: Box<dyn SimilarityIndex>,
    collection: String,
    next_ids: HashMap<RecordType, usize>,
}

impl KnowledgeStore {
    pub const DEFAULT_COLLECTION: &'static str = "hindi-learning-content";

    pub fn new(index: impl SimilarityIndex + 'static) -> Self {
        Self {
            index: Box::new(index),
            collection: Self::DEFAULT_COLLECTION.to_string(),
            next_ids: HashMap::new(),
        }
    }

    /// A store backed by a fresh [`MemoryIndex`].
    pub fn in_memory() -> Self {
        Self::new(MemoryIndex::new())
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let mut store = Self::in_memory();
        store.collection = config.collection.clone();
        store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Index `records` in batches of the type's batch size.
    ///
    /// Each record gets a fresh `<prefix>_<n>` id.  On error, batches that
    /// were already written stay in the index.
    pub fn upsert<T: Indexable>(&mut self, records: &[T]) -> Result<usize, StoreError> {
        let record_type = T::RECORD_TYPE;
        for batch in records.chunks(record_type.batch_size()) {
            let mut ids = Vec::with_capacity(batch.len());
            let mut documents = Vec::with_capacity(batch.len());
            let mut metadatas = Vec::with_capacity(batch.len());

            for record in batch {
                ids.push(self.next_id(record_type));
                documents.push(record.document());
                let mut metadata = record.metadata();
                metadata.insert(TYPE_KEY.to_string(), Value::from(record_type.as_str()));
                metadatas.push(metadata);
            }

            self.index.upsert(&ids, &documents, &metadatas)?;
            log::debug!(
                "indexed {} {record_type} records into {}",
                batch.len(),
                self.collection
            );
        }
        Ok(records.len())
    }

    /// Index every record of `content`.
    pub fn add_structured(&mut self, content: &StructuredContent) -> Result<IndexedCounts, StoreError> {
        let counts = IndexedCounts {
            language_pairs: self.upsert(&content.language_pairs)?,
            dialogues: self.upsert(&content.dialogues)?,
            vocabulary: self.upsert(&vocabulary_entries(&content.vocabulary))?,
        };
        log::info!(
            "indexed {} records into {} ({counts:?})",
            counts.total(),
            self.collection
        );
        Ok(counts)
    }

    /// Load a structured-content document from `path` and index it.
    pub fn load_from_json(&mut self, path: &Path) -> Result<IndexedCounts, StoreError> {
        let content = StructuredContent::load_from(path)?;
        self.add_structured(&content)
    }

    /// The `n_results` documents nearest to `text`, optionally of one type.
    pub fn query(
        &self,
        text: &str,
        n_results: usize,
        type_filter: Option<RecordType>,
    ) -> RetrievalResult {
        if n_results == 0 {
            return RetrievalResult::Hits(Vec::new());
        }
        let filter = type_filter.map(|t| {
            Metadata::from([(TYPE_KEY.to_string(), Value::from(t.as_str()))])
        });

        let hits = match self
            .index
            .query(&[text.to_string()], n_results, filter.as_ref())
        {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("knowledge query failed: {e}");
                return RetrievalResult::Unavailable {
                    error: e.to_string(),
                };
            }
        };

        let ids = hits.ids.into_iter().next().unwrap_or_default();
        let documents = hits.documents.into_iter().next().unwrap_or_default();
        let metadatas = hits.metadatas.into_iter().next().unwrap_or_default();
        let distances = hits.distances.into_iter().next().unwrap_or_default();

        let mut docs: Vec<RetrievedDocument> = ids
            .into_iter()
            .zip(documents)
            .zip(metadatas)
            .zip(distances)
            .map(|(((id, document), metadata), distance)| RetrievedDocument {
                id,
                document,
                metadata,
                distance,
            })
            .filter(|doc| type_filter.map_or(true, |t| doc.record_type() == Some(t)))
            .collect();
        docs.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        docs.truncate(n_results);
        RetrievalResult::Hits(docs)
    }

    /// Retrieved documents rendered as a prompt preamble.
    ///
    /// Empty when the index is unavailable or nothing matched.
    pub fn context_for_prompt(&self, query: &str, n_results: usize) -> String {
        let docs = match self.query(query, n_results, None) {
            RetrievalResult::Hits(docs) if !docs.is_empty() => docs,
            _ => return String::new(),
        };

        let mut context = String::from("CONTEXT INFORMATION:\n\n");
        for (i, doc) in docs.iter().enumerate() {
            let kind = doc
                .metadata
                .get(TYPE_KEY)
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            context.push_str(&format!("--- Document {} ({kind}) ---\n", i + 1));
            context.push_str(&doc.document);
            context.push_str("\n\n");
        }
        context
    }

    fn next_id(&mut self, record_type: RecordType) -> String {
        let n = self.next_ids.entry(record_type).or_insert(0);
        let id = format!("{}_{}", record_type.id_prefix(), n);
        *n += 1;
        id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Dialogue, DialogueTurn, LanguagePair, Vocabulary, VocabularyEntry};
    use crate::knowledge::index::QueryHits;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn content() -> StructuredContent {
        let mut vocabulary = Vocabulary::new();
        vocabulary.insert("पानी".into(), "Water".into());
        vocabulary.insert("खाना".into(), "Food".into());
        StructuredContent {
            language_pairs: vec![
                LanguagePair::new("मुझे पानी चाहिए", "I need water", 0.0),
                LanguagePair::new("नमस्ते", "Hello", 10.0),
            ],
            dialogues: vec![Dialogue {
                turns: vec![
                    DialogueTurn::new("खाना कहाँ है?", true, 0.0),
                    DialogueTurn::new("Where is the food?", false, 2.0),
                ],
                start: 0.0,
                end: 60.0,
                generated: true,
            }],
            vocabulary,
        }
    }

    /// Fails every call.
    struct BrokenIndex;

    impl SimilarityIndex for BrokenIndex {
        fn upsert(&mut self, _: &[String], _: &[String], _: &[Metadata]) -> Result<(), IndexError> {
            Err(IndexError::Backend("disk full".into()))
        }
        fn query(&self, _: &[String], _: usize, _: Option<&Metadata>) -> Result<QueryHits, IndexError> {
            Err(IndexError::Backend("connection reset".into()))
        }
        fn len(&self) -> usize {
            0
        }
    }

    /// Records batch sizes and ignores filters on query.
    #[derive(Default)]
    struct SloppyIndex {
        inner: MemoryIndex,
        batches: Arc<Mutex<Vec<usize>>>,
    }

    impl SimilarityIndex for SloppyIndex {
        fn upsert(&mut self, ids: &[String], docs: &[String], metas: &[Metadata]) -> Result<(), IndexError> {
            self.batches.lock().unwrap().push(ids.len());
            self.inner.upsert(ids, docs, metas)
        }
        fn query(&self, texts: &[String], n: usize, _: Option<&Metadata>) -> Result<QueryHits, IndexError> {
            self.inner.query(texts, n, None)
        }
        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn add_structured_counts_every_type() {
        let mut store = KnowledgeStore::in_memory();
        let counts = store.add_structured(&content()).unwrap();
        assert_eq!(
            counts,
            IndexedCounts {
                language_pairs: 2,
                dialogues: 1,
                vocabulary: 2,
            }
        );
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn ids_keep_counting_across_calls() {
        let mut store = KnowledgeStore::in_memory();
        store.upsert(&[LanguagePair::new("एक", "One", 0.0)]).unwrap();
        store.upsert(&[LanguagePair::new("दो", "Two", 0.0)]).unwrap();
        assert_eq!(store.len(), 2);

        let result = store.query("Two दो", 1, None);
        assert_eq!(result.documents()[0].id, "pair_1");
    }

    #[test]
    fn results_are_ranked_and_bounded() {
        let mut store = KnowledgeStore::in_memory();
        store.add_structured(&content()).unwrap();

        let result = store.query("पानी water", 3, None);
        let docs = result.documents();
        assert_eq!(docs.len(), 3);
        assert!(docs.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(docs[0].document.contains("पानी"));
    }

    #[test]
    fn type_filter_is_honoured_even_by_sloppy_backends() {
        let mut store = KnowledgeStore::new(SloppyIndex::default());
        store.add_structured(&content()).unwrap();

        for t in RecordType::ALL {
            let result = store.query("food खाना water", 10, Some(t));
            assert!(!result.documents().is_empty());
            assert!(result.documents().iter().all(|d| d.record_type() == Some(t)));
        }
    }

    #[test]
    fn uploads_are_batched_per_type() {
        let index = SloppyIndex::default();
        let batches = Arc::clone(&index.batches);
        let mut store = KnowledgeStore::new(index);

        let entries: Vec<VocabularyEntry> = (0..450)
            .map(|i| VocabularyEntry {
                word: format!("शब्द{i}"),
                meaning: format!("word {i}"),
            })
            .collect();
        store.upsert(&entries).unwrap();
        assert_eq!(*batches.lock().unwrap(), [200, 200, 50]);
    }

    #[test]
    fn broken_index_reports_unavailable() {
        let mut store = KnowledgeStore::new(BrokenIndex);
        assert!(matches!(
            store.add_structured(&content()),
            Err(StoreError::Index(IndexError::Backend(_)))
        ));

        let result = store.query("anything", 3, Some(RecordType::Vocabulary));
        assert!(result.is_unavailable());
        assert!(result.documents().is_empty());
        assert_eq!(store.context_for_prompt("anything", 3), "");
    }

    #[test]
    fn context_block_format() {
        let mut store = KnowledgeStore::in_memory();
        store.upsert(&[LanguagePair::new("नमस्ते", "Hello", 0.0)]).unwrap();

        let context = store.context_for_prompt("hello", 3);
        assert_eq!(
            context,
            "CONTEXT INFORMATION:\n\n--- Document 1 (language_pair) ---\nHindi: नमस्ते\nEnglish: Hello\n\n"
        );
        assert_eq!(KnowledgeStore::in_memory().context_for_prompt("hello", 3), "");
    }

    #[test]
    fn load_from_json_indexes_saved_content() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("structured_data.json");
        content().save_to(&path).unwrap();

        let mut store = KnowledgeStore::in_memory();
        assert_eq!(store.load_from_json(&path).unwrap().total(), 5);

        let missing = store.load_from_json(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(StoreError::Content(_))));
    }

    #[test]
    fn zero_results_requested() {
        let mut store = KnowledgeStore::in_memory();
        store.add_structured(&content()).unwrap();
        assert_eq!(store.query("water", 0, None), RetrievalResult::Hits(vec![]));
    }
}
