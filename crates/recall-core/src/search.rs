//! Lexical retrieval over the in-memory index.
//!
//! Scoring is plain term overlap: the fraction of distinct query tokens
//! present in a chunk, damped by how often the matching tokens occur
//! there. No corpus statistics and no learned representations — identical
//! inputs always rank identically.
//!
//! # Pipeline
//!
//! 1. Normalize the query: lower-case, split on non-alphanumeric
//!    boundaries, drop short tokens and stop words, dedupe.
//! 2. Score every chunk in insertion order.
//! 3. Keep scores ≥ `min_score`, stable-sort descending (ties keep
//!    insertion order, earlier chunk first), truncate to `top_k`.
//! 4. Project the survivors into [`Source`]s with an excerpt anchored at
//!    the first query-term hit.

use std::collections::HashMap;

use tracing::debug;

use crate::index::Index;
use crate::models::Source;

/// Knobs for candidate selection.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum sources to return.
    pub top_k: usize,
    /// Relevance floor; chunks scoring below it are dropped.
    pub min_score: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_score: 0.1,
        }
    }
}

/// Common English function words excluded from queries.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "how",
    "in", "is", "it", "of", "on", "or", "that", "the", "this", "to", "was", "what", "when",
    "where", "which", "who", "why", "will", "with",
];

/// Weight of the frequency component in the final score:
/// `score = coverage × ((1 − TF_WEIGHT) + TF_WEIGHT × saturation)`.
const TF_WEIGHT: f64 = 0.25;

/// Maximum snippet length in characters.
const SNIPPET_CHARS: usize = 320;

/// Normalize a free-text query into the distinct tokens used for scoring.
///
/// Tokens are lower-cased alphanumeric runs of at least two characters,
/// minus stop words, in order of first appearance. An empty result means
/// the query has nothing scoreable in it.
pub fn normalize_query(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for (token, _) in tokenize(query.trim()) {
        if token.chars().count() < 2 || STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        if !terms.iter().any(|t| t == &token) {
            terms.push(token);
        }
    }
    terms
}

/// Canonical response-cache key for a query: its normalized tokens joined
/// by a single space. Phrasings that normalize identically share an entry,
/// which is exactly when a fresh retrieval would also be identical.
pub fn cache_key(query: &str) -> String {
    normalize_query(query).join(" ")
}

/// Score every chunk in the index against `query` and return the best
/// matches as [`Source`]s, highest score first. Ties keep index insertion
/// order. Empty queries, an empty index, and zero-overlap queries all
/// produce an empty result, never an error.
pub fn search(index: &Index, query: &str, params: &SearchParams) -> Vec<Source> {
    let terms = normalize_query(query);
    if terms.is_empty() || index.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &crate::models::Chunk)> = Vec::new();
    for chunk in index.all() {
        let score = score_chunk(&terms, &term_frequencies(&chunk.text));
        if score > 0.0 && score >= params.min_score {
            scored.push((score, chunk));
        }
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(params.top_k);

    debug!(
        query,
        scanned = index.len(),
        kept = scored.len(),
        "search complete"
    );

    scored
        .into_iter()
        .map(|(score, chunk)| Source {
            id: chunk.id.clone(),
            doc_title: chunk.doc_title.clone(),
            snippet: make_snippet(&chunk.text, &terms),
            score,
        })
        .collect()
}

/// Term-overlap score of one chunk against the normalized query terms.
///
/// `coverage` is the fraction of query terms the chunk contains at all;
/// the frequency saturation term `tf/(tf+1)` nudges chunks that mention a
/// matched term repeatedly above chunks that mention it once, without ever
/// letting frequency outweigh coverage. Result is in `[0.0, 1.0]`; zero
/// overlap is exactly `0.0`.
fn score_chunk(terms: &[String], chunk_tf: &HashMap<String, usize>) -> f64 {
    let mut matched = 0usize;
    let mut saturation = 0.0f64;
    for term in terms {
        if let Some(&tf) = chunk_tf.get(term) {
            matched += 1;
            saturation += tf as f64 / (tf as f64 + 1.0);
        }
    }
    if matched == 0 {
        return 0.0;
    }
    let coverage = matched as f64 / terms.len() as f64;
    coverage * ((1.0 - TF_WEIGHT) + TF_WEIGHT * saturation / matched as f64)
}

/// Token frequency table for a chunk's text.
fn term_frequencies(text: &str) -> HashMap<String, usize> {
    let mut tf = HashMap::new();
    for (token, _) in tokenize(text) {
        *tf.entry(token).or_insert(0) += 1;
    }
    tf
}

/// Split text into lower-cased alphanumeric runs with their byte offsets.
fn tokenize(text: &str) -> Vec<(String, usize)> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if current.is_empty() {
                start = i;
            }
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push((std::mem::take(&mut current), start));
        }
    }
    if !current.is_empty() {
        tokens.push((current, start));
    }
    tokens
}

/// Excerpt of up to [`SNIPPET_CHARS`] characters beginning at the sentence
/// that contains the first query-term hit, with `…` marking cut edges.
fn make_snippet(text: &str, terms: &[String]) -> String {
    let anchor = tokenize(text)
        .into_iter()
        .find(|(token, _)| terms.iter().any(|t| t == token))
        .map(|(_, offset)| offset)
        .unwrap_or(0);

    let start = sentence_start(text, anchor);
    let end = text[start..]
        .char_indices()
        .nth(SNIPPET_CHARS)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());

    let mut snippet = String::new();
    if start > 0 {
        snippet.push('…');
    }
    snippet.push_str(text[start..end].trim());
    if end < text.len() {
        snippet.push('…');
    }
    snippet
}

/// Byte offset where the sentence containing `pos` begins.
fn sentence_start(text: &str, pos: usize) -> usize {
    let head = &text[..pos];
    let mut best = 0usize;
    for delim in [". ", "! ", "? ", ".\n", "!\n", "?\n", "\n"] {
        if let Some(i) = head.rfind(delim) {
            best = best.max(i + delim.len());
        }
    }
    // Step over any further whitespace to the sentence proper.
    best + (text[best..].len() - text[best..].trim_start().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn chunk(id: &str, doc_id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            doc_id: doc_id.to_string(),
            doc_title: format!("Title of {}", doc_id),
            text: text.to_string(),
        }
    }

    fn index_of(texts: &[&str]) -> Index {
        let mut index = Index::new();
        let chunks = texts
            .iter()
            .enumerate()
            .map(|(i, t)| chunk(&format!("d{}:0", i), &format!("d{}", i), t))
            .collect();
        index.insert(chunks).unwrap();
        index
    }

    #[test]
    fn test_normalize_drops_stop_words_and_short_tokens() {
        let terms = normalize_query("What is the attendance requirement?");
        assert_eq!(terms, vec!["attendance", "requirement"]);
    }

    #[test]
    fn test_normalize_dedupes_in_first_appearance_order() {
        let terms = normalize_query("policy POLICY attendance policy");
        assert_eq!(terms, vec!["policy", "attendance"]);
    }

    #[test]
    fn test_normalize_splits_on_punctuation() {
        let terms = normalize_query("grading/marks,criteria");
        assert_eq!(terms, vec!["grading", "marks", "criteria"]);
    }

    #[test]
    fn test_cache_key_is_joined_terms() {
        assert_eq!(
            cache_key("  What IS the Attendance?? "),
            "attendance".to_string()
        );
        assert_eq!(cache_key("the of is"), "");
    }

    #[test]
    fn test_empty_query_returns_empty() {
        let index = index_of(&["anything at all"]);
        assert!(search(&index, "", &SearchParams::default()).is_empty());
        assert!(search(&index, "   ", &SearchParams::default()).is_empty());
        // Stop words only: normalizes to nothing.
        assert!(search(&index, "what is the", &SearchParams::default()).is_empty());
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = Index::new();
        assert!(search(&index, "attendance", &SearchParams::default()).is_empty());
    }

    #[test]
    fn test_zero_overlap_excluded_even_without_floor() {
        let index = index_of(&["completely unrelated text about gardening"]);
        let params = SearchParams {
            top_k: 5,
            min_score: 0.0,
        };
        assert!(search(&index, "quantum chromodynamics", &params).is_empty());
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let index = index_of(&[
            "attendance attendance attendance policy policy exam",
            "attendance",
            "policy exam final",
        ]);
        let params = SearchParams {
            top_k: 10,
            min_score: 0.0,
        };
        for source in search(&index, "attendance policy exam final grade", &params) {
            assert!(
                source.score > 0.0 && source.score <= 1.0,
                "score out of range: {}",
                source.score
            );
        }
    }

    #[test]
    fn test_coverage_outranks_frequency() {
        let index = index_of(&[
            "attendance attendance attendance attendance attendance",
            "attendance policy",
        ]);
        let results = search(&index, "attendance policy", &SearchParams::default());
        assert_eq!(results.len(), 2);
        // Both terms present beats one term repeated.
        assert_eq!(results[0].id, "d1:0");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_frequency_breaks_equal_coverage() {
        let index = index_of(&[
            "the exam is difficult",
            "the exam covers the exam topics from every exam sheet",
        ]);
        let results = search(&index, "exam", &SearchParams::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "d1:0");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = index_of(&[
            "the marking rubric",
            "the marking rubric",
            "the marking rubric",
        ]);
        let results = search(&index, "marking rubric", &SearchParams::default());
        assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["d0:0", "d1:0", "d2:0"]);
    }

    #[test]
    fn test_top_k_truncates() {
        let index = index_of(&["exam one", "exam two", "exam three", "exam four"]);
        let params = SearchParams {
            top_k: 2,
            min_score: 0.0,
        };
        assert_eq!(search(&index, "exam", &params).len(), 2);
    }

    #[test]
    fn test_min_score_floor_filters() {
        let index = index_of(&[
            "attendance policy exam grading marks",
            "attendance only mentioned here",
        ]);
        // Second chunk matches 1 of 5 terms, scoring about 0.17; floor above that.
        let params = SearchParams {
            top_k: 10,
            min_score: 0.3,
        };
        let results = search(&index, "attendance policy exam grading marks", &params);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "d0:0");
    }

    #[test]
    fn test_course_policy_scenario() {
        let mut index = Index::new();
        index
            .insert(vec![chunk(
                "policy:0",
                "policy",
                "This course covers Natural Language Processing. \
                 Attendance of 75% is mandatory to sit in the final exam.",
            )])
            .unwrap();

        let results = search(&index, "What is the attendance requirement?", &SearchParams::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].score > 0.0);
        assert!(results[0].snippet.contains("75%"));
    }

    #[test]
    fn test_snippet_anchors_on_first_hit() {
        let filler = "Nothing relevant is said here. ".repeat(20);
        let text = format!("{}The deadline policy allows two late days.", filler);
        let index = index_of(&[&text]);
        let params = SearchParams {
            top_k: 1,
            min_score: 0.0,
        };
        let results = search(&index, "deadline policy", &params);
        assert_eq!(results.len(), 1);
        assert!(results[0].snippet.starts_with('…'));
        assert!(results[0].snippet.contains("deadline policy"));
    }

    #[test]
    fn test_snippet_bounded_length() {
        let text = format!("deadline {}", "padding words here ".repeat(60));
        let index = index_of(&[&text]);
        let params = SearchParams {
            top_k: 1,
            min_score: 0.0,
        };
        let results = search(&index, "deadline", &params);
        assert!(results[0].snippet.chars().count() <= SNIPPET_CHARS + 2);
        assert!(results[0].snippet.ends_with('…'));
    }

    #[test]
    fn test_multibyte_query_and_text() {
        let index = index_of(&["Die Prüfung umfasst alle Kapitel über Grammatik."]);
        let params = SearchParams {
            top_k: 3,
            min_score: 0.0,
        };
        let results = search(&index, "Prüfung Grammatik", &params);
        assert_eq!(results.len(), 1);
        assert!(results[0].score > 0.8);
    }
}
