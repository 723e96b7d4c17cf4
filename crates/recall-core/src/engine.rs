//! The engine owns the index and the answer cache and coordinates the
//! chunk → index → search → synthesize pipeline behind a `&self` API,
//! so one instance can be shared across threads.
//!
//! Index and cache sit behind two independent [`RwLock`]s and a lock is
//! never held while taking the other. Because retrieval is deterministic,
//! two threads racing to cache the same query store identical answers.
//!
//! ```
//! use recall_core::engine::Engine;
//! use recall_core::models::Document;
//!
//! let engine = Engine::default();
//! engine
//!     .ingest(&Document {
//!         id: "greeting".to_string(),
//!         title: "Greeting".to_string(),
//!         content: "Hello from the engine.".to_string(),
//!         upload_date: chrono::Utc::now(),
//!         chunk_count: None,
//!     })
//!     .unwrap();
//!
//! let answer = engine.answer("hello engine");
//! assert!(answer.confidence > 0.0);
//! ```

use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::chunk::{chunk_document, ChunkParams};
use crate::error::EngineError;
use crate::index::Index;
use crate::models::{Answer, Document};
use crate::search::{cache_key, search, SearchParams};
use crate::synthesize::{synthesize, SynthesisParams};

/// Tuning for every pipeline stage, assembled by the caller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub chunking: ChunkParams,
    pub retrieval: SearchParams,
    pub synthesis: SynthesisParams,
    /// Maximum cached answers before FIFO eviction.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkParams::default(),
            retrieval: SearchParams::default(),
            synthesis: SynthesisParams::default(),
            cache_capacity: 512,
        }
    }
}

/// Point-in-time size counters, for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub documents: usize,
    pub chunks: usize,
    pub cached_answers: usize,
}

/// Shared question-answering engine over locally ingested documents.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    index: RwLock<Index>,
    cache: RwLock<ResponseCache>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = ResponseCache::new(config.cache_capacity);
        Self {
            config,
            index: RwLock::new(Index::new()),
            cache: RwLock::new(cache),
        }
    }

    /// Chunk a document and add it to the index.
    ///
    /// Returns the number of chunks produced. Blank documents index
    /// nothing and return `Ok(0)`. Ingesting a document whose id is
    /// already present fails with [`EngineError::DuplicateChunkId`] and
    /// leaves the index untouched; remove the old version first to
    /// replace it. Any successful ingest clears the answer cache, since
    /// new content can change what any fresh retrieval would find.
    pub fn ingest(&self, doc: &Document) -> Result<usize, EngineError> {
        let chunks = chunk_document(doc, &self.config.chunking);
        let count = chunks.len();
        if count == 0 {
            debug!(doc_id = %doc.id, "document has no indexable content");
            return Ok(0);
        }
        self.index.write().unwrap().insert(chunks).map_err(|err| {
            warn!(doc_id = %doc.id, %err, "ingest rejected");
            err
        })?;
        self.cache.write().unwrap().clear();
        info!(doc_id = %doc.id, chunks = count, "ingested document");
        Ok(count)
    }

    /// Answer a question from the indexed documents.
    ///
    /// Served from the cache when an equivalent query (same normalized
    /// tokens) was answered since the index last changed; otherwise
    /// retrieves, synthesizes, and caches. Queries that normalize to
    /// nothing get the fallback answer directly and are not cached.
    pub fn answer(&self, query: &str) -> Answer {
        let key = cache_key(query);
        if key.is_empty() {
            return synthesize(query, &[], &self.config.synthesis);
        }
        if let Some(hit) = self.cache.read().unwrap().get(&key) {
            debug!(query, "answer served from cache");
            return hit.clone();
        }
        let sources = {
            let index = self.index.read().unwrap();
            search(&index, query, &self.config.retrieval)
        };
        let answer = synthesize(query, &sources, &self.config.synthesis);
        self.cache.write().unwrap().put(key, answer.clone());
        answer
    }

    /// Whether [`answer`](Engine::answer) for this query would be served
    /// from the cache right now.
    pub fn cached(&self, query: &str) -> bool {
        let key = cache_key(query);
        !key.is_empty() && self.cache.read().unwrap().get(&key).is_some()
    }

    /// Remove every chunk of `doc_id` from the index, along with any
    /// cached answers citing them. Returns the number of chunks removed;
    /// zero for unknown documents.
    pub fn remove_document(&self, doc_id: &str) -> usize {
        let removed = self.index.write().unwrap().remove_by_document(doc_id);
        if removed > 0 {
            let purged = self.cache.write().unwrap().remove_document_entries(doc_id);
            info!(doc_id, chunks = removed, purged, "removed document");
        }
        removed
    }

    pub fn stats(&self) -> EngineStats {
        let (documents, chunks) = {
            let index = self.index.read().unwrap();
            (index.document_count(), index.len())
        };
        let cached_answers = self.cache.read().unwrap().len();
        EngineStats {
            documents,
            chunks,
            cached_answers,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesize::FALLBACK_ANSWER;
    use chrono::Utc;

    fn doc(id: &str, title: &str, content: &str) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            upload_date: Utc::now(),
            chunk_count: None,
        }
    }

    fn policy_doc() -> Document {
        doc(
            "nlp-policy",
            "NLP Course Policy",
            "This course covers Natural Language Processing fundamentals. \
             Attendance of 75% is mandatory to sit in the final exam. \
             Grading is based on assignments and a final project.",
        )
    }

    #[test]
    fn test_ingest_reports_chunks_and_stats() {
        let engine = Engine::default();
        let count = engine.ingest(&policy_doc()).unwrap();
        assert_eq!(count, 1);
        let stats = engine.stats();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.chunks, 1);
        assert_eq!(stats.cached_answers, 0);
    }

    #[test]
    fn test_ingest_long_document_multiple_chunks() {
        let engine = Engine::default();
        let content = "Every lecture builds on the previous one. ".repeat(40);
        let count = engine.ingest(&doc("long", "Long", &content)).unwrap();
        assert!(count > 1);
        assert_eq!(engine.stats().chunks, count);
    }

    #[test]
    fn test_empty_document_indexes_nothing() {
        let engine = Engine::default();
        assert_eq!(engine.ingest(&doc("blank", "Blank", "   \n\n  ")).unwrap(), 0);
        assert_eq!(engine.stats().documents, 0);
    }

    #[test]
    fn test_duplicate_ingest_rejected_without_side_effects() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        let before = engine.stats();

        let err = engine.ingest(&policy_doc()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateChunkId { .. }));
        assert_eq!(engine.stats(), before);
    }

    #[test]
    fn test_reingest_after_removal() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        assert_eq!(engine.remove_document("nlp-policy"), 1);
        assert_eq!(engine.stats().documents, 0);
        engine.ingest(&policy_doc()).unwrap();
        assert_eq!(engine.stats().documents, 1);
    }

    #[test]
    fn test_remove_missing_document_is_zero() {
        let engine = Engine::default();
        assert_eq!(engine.remove_document("nope"), 0);
    }

    #[test]
    fn test_course_policy_question_end_to_end() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();

        let answer = engine.answer("What is the attendance requirement?");
        assert!(!answer.sources.is_empty());
        assert!(answer.sources.iter().all(|s| s.score > 0.0));
        assert!(answer.answer.contains("75%"));
        assert!(answer.confidence > 0.0);
    }

    #[test]
    fn test_fallback_on_empty_engine() {
        let engine = Engine::default();
        let answer = engine.answer("anything at all");
        assert_eq!(answer.answer, FALLBACK_ANSWER);
        assert!(answer.sources.is_empty());
        assert_eq!(answer.confidence, 0.0);
    }

    #[test]
    fn test_fallback_on_unrelated_query() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        let answer = engine.answer("submarine propulsion schematics");
        assert_eq!(answer.answer, FALLBACK_ANSWER);
        assert_eq!(answer.confidence, 0.0);
    }

    #[test]
    fn test_unscoreable_query_not_cached() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        let answer = engine.answer("what is the");
        assert_eq!(answer.answer, FALLBACK_ANSWER);
        assert!(!engine.cached("what is the"));
        assert_eq!(engine.stats().cached_answers, 0);
    }

    #[test]
    fn test_cache_hit_equals_fresh_answer() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();

        let first = engine.answer("What is the attendance requirement?");
        assert!(engine.cached("What is the attendance requirement?"));
        let second = engine.answer("What is the attendance requirement?");
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_shared_across_phrasings() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();

        engine.answer("What is the attendance requirement?");
        // Normalizes to the same tokens, so it hits the same entry.
        assert!(engine.cached("attendance requirement"));
        assert_eq!(engine.stats().cached_answers, 1);
    }

    #[test]
    fn test_ingest_clears_cache() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        engine.answer("What is the attendance requirement?");
        assert!(engine.cached("attendance requirement"));

        engine
            .ingest(&doc("extra", "Extra", "Office hours run on Fridays."))
            .unwrap();
        assert!(!engine.cached("attendance requirement"));
        assert_eq!(engine.stats().cached_answers, 0);
    }

    #[test]
    fn test_removal_purges_only_citing_answers() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        engine
            .ingest(&doc("hours", "Office Hours", "Office hours run on Fridays."))
            .unwrap();

        engine.answer("attendance requirement");
        engine.answer("office hours");
        assert_eq!(engine.stats().cached_answers, 2);

        engine.remove_document("nlp-policy");
        assert!(!engine.cached("attendance requirement"));
        assert!(engine.cached("office hours"));

        // A fresh ask now finds nothing to cite.
        let answer = engine.answer("attendance requirement");
        assert_eq!(answer.answer, FALLBACK_ANSWER);
    }

    #[test]
    fn test_engines_are_independent() {
        let a = Engine::default();
        let b = Engine::default();
        a.ingest(&policy_doc()).unwrap();
        assert_eq!(b.stats().documents, 0);
        assert_eq!(b.answer("attendance").answer, FALLBACK_ANSWER);
    }

    #[test]
    fn test_concurrent_answers_agree() {
        let engine = Engine::default();
        engine.ingest(&policy_doc()).unwrap();
        let baseline = engine.answer("What is the attendance requirement?");

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    assert_eq!(engine.answer("What is the attendance requirement?"), baseline);
                });
            }
        });
    }

    #[test]
    fn test_concurrent_ingest_of_distinct_documents() {
        let engine = Engine::default();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let engine = &engine;
                let id = format!("doc-{}", i);
                scope.spawn(move || {
                    engine
                        .ingest(&doc(&id, "Notes", "Some course notes with policy text."))
                        .unwrap();
                });
            }
        });
        assert_eq!(engine.stats().documents, 4);
    }
}
