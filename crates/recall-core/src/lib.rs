//! # Recall Core
//!
//! Shared logic for Recall: data models, chunking, the in-memory index,
//! lexical retrieval, answer synthesis, response caching, and the engine
//! that ties the pipeline together.
//!
//! This crate does no I/O and talks to no network. Everything is
//! deterministic: the same documents and the same question always produce
//! the same answer.

pub mod cache;
pub mod chunk;
pub mod engine;
pub mod error;
pub mod index;
pub mod models;
pub mod search;
pub mod synthesize;
