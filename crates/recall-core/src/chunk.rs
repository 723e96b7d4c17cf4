//! Boundary-preferring overlapping text chunker.
//!
//! Splits document content into the fixed-size overlapping segments the
//! index operates on. Cut points prefer a paragraph break, then a sentence
//! end, near the target length; only when neither lands inside the
//! tolerance window does the splitter cut at the exact target.
//!
//! # Algorithm
//!
//! 1. Place the ideal cut `target_chars` characters after the segment
//!    start.
//! 2. Search `ideal ± boundary_window` for the paragraph break (`\n\n`)
//!    closest to the ideal cut; failing that, the closest sentence end
//!    (`.`, `!` or `?` followed by whitespace).
//! 3. Cut there, or exactly at the ideal point when no boundary is in the
//!    window. Cuts always land on UTF-8 character boundaries.
//! 4. The next segment starts `overlap_chars` before the previous cut, so
//!    consecutive chunks share context across the seam.
//! 5. A tail shorter than `target_chars + boundary_window` is absorbed
//!    into the final segment rather than split off as a sliver.
//!
//! Every character of the input appears in at least one chunk, and chunk
//! texts are verbatim slices of the content. Empty or whitespace-only
//! content yields no chunks.

use crate::models::{Chunk, Document};

/// Chunker tuning parameters, decoupled from application config.
#[derive(Debug, Clone)]
pub struct ChunkParams {
    /// Target segment length in characters.
    pub target_chars: usize,
    /// Characters shared between consecutive segments.
    pub overlap_chars: usize,
    /// How far from the target cut a boundary may be used.
    pub boundary_window: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            target_chars: 500,
            overlap_chars: 80,
            boundary_window: 100,
        }
    }
}

/// Split a document's content into ordered, overlapping chunks.
///
/// Returns zero chunks for empty or whitespace-only content; that is a
/// valid outcome, not an error. Chunk ids are assigned with [`chunk_id`]
/// and are deterministic, so the same document always chunks identically.
pub fn chunk_document(doc: &Document, params: &ChunkParams) -> Vec<Chunk> {
    let content = doc.content.as_str();
    if content.trim().is_empty() {
        return Vec::new();
    }

    let target = params.target_chars.max(1);
    // Overlap is clamped below the target so every step advances.
    let overlap = params.overlap_chars.min(target - 1);

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < content.len() {
        let ideal = advance_chars(content, start, target);
        let reach = advance_chars(content, start, target + params.boundary_window);

        let end = if reach >= content.len() {
            content.len()
        } else {
            pick_boundary(content, start, ideal, params.boundary_window)
        };

        chunks.push(make_chunk(doc, chunks.len(), &content[start..end]));

        if end >= content.len() {
            break;
        }
        let next = retreat_chars(content, end, overlap);
        start = if next > start { next } else { end };
    }

    chunks
}

/// Deterministic chunk id: the parent document id plus the chunk ordinal.
///
/// Determinism is load-bearing: re-ingesting a document without removing
/// it first reproduces the same ids, which the index rejects as duplicates
/// instead of silently double-indexing the content.
pub fn chunk_id(doc_id: &str, index: usize) -> String {
    format!("{}:{}", doc_id, index)
}

/// Whether `chunk_id` was minted by [`chunk_id`] for `doc_id`.
pub fn chunk_belongs_to(chunk_id: &str, doc_id: &str) -> bool {
    match chunk_id.strip_prefix(doc_id) {
        Some(rest) => match rest.strip_prefix(':') {
            Some(ordinal) => !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        },
        None => false,
    }
}

fn make_chunk(doc: &Document, index: usize, text: &str) -> Chunk {
    Chunk {
        id: chunk_id(&doc.id, index),
        doc_id: doc.id.clone(),
        doc_title: doc.title.clone(),
        text: text.to_string(),
    }
}

/// Choose the cut point for a segment starting at `start` with its ideal
/// end at `ideal`. Returns a byte offset strictly after `start`, always on
/// a character boundary.
fn pick_boundary(content: &str, start: usize, ideal: usize, window: usize) -> usize {
    let mut lo = retreat_chars(content, ideal, window);
    if lo <= start {
        lo = advance_chars(content, start, 1);
    }
    let hi = advance_chars(content, ideal, window);
    if lo >= hi {
        return ideal;
    }

    let slice = &content[lo..hi];
    let goal = ideal - lo;

    if let Some(pos) = closest_occurrence(slice, "\n\n", goal) {
        // Cut after the blank line; the next chunk opens on the paragraph.
        return lo + pos + 2;
    }
    if let Some(pos) = closest_sentence_end(slice, goal) {
        return lo + pos;
    }
    ideal
}

/// Offset of the occurrence of `needle` in `slice` closest to `goal`.
fn closest_occurrence(slice: &str, needle: &str, goal: usize) -> Option<usize> {
    slice
        .match_indices(needle)
        .map(|(i, _)| i)
        .min_by_key(|i| i.abs_diff(goal))
}

/// Offset just past the sentence terminator closest to `goal`, if any.
/// A terminator is `.`, `!` or `?` immediately followed by whitespace.
fn closest_sentence_end(slice: &str, goal: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut chars = slice.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(_, next)) = chars.peek() {
            if next.is_whitespace() {
                let cut = i + 1;
                if best.map_or(true, |b| cut.abs_diff(goal) < b.abs_diff(goal)) {
                    best = Some(cut);
                }
            }
        }
    }
    best
}

/// Byte offset `count` characters after `from` (clamped to the end).
fn advance_chars(content: &str, from: usize, count: usize) -> usize {
    content[from..]
        .char_indices()
        .nth(count)
        .map(|(i, _)| from + i)
        .unwrap_or(content.len())
}

/// Byte offset `count` characters before `from` (clamped to the start).
fn retreat_chars(content: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    content[..from]
        .char_indices()
        .nth_back(count - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}
