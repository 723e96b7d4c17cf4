//! Core data models used throughout Recall.
//!
//! These types represent the documents, chunks, and answers that flow
//! through the ingestion and retrieval pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user-supplied text resource, owned by the host's document manager.
///
/// The engine only ever reads `content`; `chunk_count` is written by the
/// host from the value ingestion returns.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub upload_date: DateTime<Utc>,
    pub chunk_count: Option<usize>,
}

/// A bounded contiguous slice of a document's text, the unit of retrieval.
///
/// Immutable once created and owned exclusively by the index; callers only
/// ever see [`Source`] projections.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub doc_id: String,
    pub doc_title: String,
    pub text: String,
}

/// A chunk projected into evidence for an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: String,
    pub doc_title: String,
    /// Excerpt of the chunk text, anchored at the first query-term hit.
    pub snippet: String,
    /// Relevance in `[0.0, 1.0]`.
    pub score: f64,
}

/// A synthesized answer with its supporting sources and confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
    /// The best supporting source's score; `0.0` for the fallback reply.
    pub confidence: f64,
}
