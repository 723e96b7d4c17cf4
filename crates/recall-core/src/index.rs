//! In-memory chunk index.
//!
//! Holds every chunk across all ingested documents in insertion order,
//! which is also the order the retriever scans and the order ties resolve
//! in. Batch inserts are validated before anything is committed, so a
//! duplicate chunk id rejects the whole batch and leaves the index
//! untouched — ingestion is all-or-nothing with respect to visibility.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::Chunk;

/// Append-only chunk collection with removal by document.
#[derive(Debug, Default)]
pub struct Index {
    chunks: Vec<Chunk>,
    ids: HashSet<String>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a batch of chunks; either all of them land or none do.
    ///
    /// Returns the number inserted. A chunk id already present in the
    /// index, or repeated within the batch, is a caller-side contract
    /// violation and rejects the batch with
    /// [`EngineError::DuplicateChunkId`].
    pub fn insert(&mut self, chunks: Vec<Chunk>) -> Result<usize, EngineError> {
        let mut batch_ids: HashSet<&str> = HashSet::with_capacity(chunks.len());
        for c in &chunks {
            if self.ids.contains(&c.id) || !batch_ids.insert(c.id.as_str()) {
                return Err(EngineError::DuplicateChunkId { id: c.id.clone() });
            }
        }

        let inserted = chunks.len();
        for c in chunks {
            self.ids.insert(c.id.clone());
            self.chunks.push(c);
        }
        Ok(inserted)
    }

    /// Remove every chunk belonging to `doc_id`; returns how many were
    /// removed (zero when the document was never ingested).
    pub fn remove_by_document(&mut self, doc_id: &str) -> usize {
        let ids = &mut self.ids;
        let before = self.chunks.len();
        self.chunks.retain(|c| {
            if c.doc_id == doc_id {
                ids.remove(&c.id);
                false
            } else {
                true
            }
        });
        before - self.chunks.len()
    }

    /// Iterate every current chunk in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of distinct documents with at least one chunk present.
    pub fn document_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.chunks
            .iter()
            .filter(|c| seen.insert(c.doc_id.as_str()))
            .count()
    }

    /// Number of chunks belonging to `doc_id`.
    pub fn chunks_for_document(&self, doc_id: &str) -> usize {
        self.chunks.iter().filter(|c| c.doc_id == doc_id).count()
    }
}
