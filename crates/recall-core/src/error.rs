//! Engine error type.
//!
//! The engine has almost no failure modes: empty documents degrade to zero
//! chunks and unmatched queries get the fallback answer, neither of which
//! is an error. What remains is the contract violation below.

use thiserror::Error;

/// Contract violations surfaced by the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A chunk id collided with one already in the index. Chunk ids are
    /// derived from the document id, so this means a document was
    /// re-ingested without being removed first, or the caller supplied
    /// colliding document ids.
    #[error("duplicate chunk id in index: {id}")]
    DuplicateChunkId { id: String },
}
