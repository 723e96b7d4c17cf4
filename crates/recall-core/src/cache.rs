//! Bounded FIFO cache of synthesized answers, keyed by normalized query.
//!
//! Hits must be indistinguishable from recomputation, so the cache is
//! kept strictly consistent with the index: the engine clears it whenever
//! new chunks land and purges per-document entries on removal.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::chunk::chunk_belongs_to;
use crate::models::Answer;

/// FIFO-evicting answer store.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, Answer>,
    order: VecDeque<String>,
    capacity: usize,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` answers. A capacity of
    /// zero is bumped to one so `put` always retains what it stored.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.entries.get(key)
    }

    /// Store an answer under `key`. Re-storing an existing key replaces
    /// the value without changing its eviction position. When the cache
    /// grows past capacity the oldest entry is evicted.
    pub fn put(&mut self, key: String, answer: Answer) {
        if self.entries.insert(key.clone(), answer).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                debug!(key = %oldest, "evicted oldest cached answer");
            }
        }
    }

    /// Drop every cached answer that cites a chunk of `doc_id`. Returns
    /// how many entries were removed.
    pub fn remove_document_entries(&mut self, doc_id: &str) -> usize {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, answer)| {
                answer
                    .sources
                    .iter()
                    .any(|s| chunk_belongs_to(&s.id, doc_id))
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            self.entries.remove(key);
        }
        if !doomed.is_empty() {
            self.order.retain(|k| self.entries.contains_key(k));
        }
        doomed.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
