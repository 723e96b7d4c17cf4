//! Extractive answer composition.
//!
//! The answer text is assembled verbatim from retrieved snippets — no
//! paraphrasing, no generation. When retrieval found nothing, a fixed
//! fallback sentence is returned with zero confidence so callers can tell
//! "no match" apart from a real answer without string sniffing.

use tracing::debug;

use crate::models::{Answer, Source};

/// Reply used when no source cleared the relevance floor.
pub const FALLBACK_ANSWER: &str = "No confident local match found in the indexed documents.";

/// Appended to an answer body that was cut at the length limit.
const TRUNCATION_MARKER: &str = " [truncated]";

/// Limits applied while composing an answer.
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    /// How many of the top sources to quote in the answer body.
    pub max_sources: usize,
    /// Upper bound on the answer body, in characters.
    pub max_answer_chars: usize,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            max_sources: 3,
            max_answer_chars: 1200,
        }
    }
}

/// Compose an [`Answer`] from ranked sources.
///
/// Quotes up to `max_sources` snippets, each attributed to its document
/// title, separated by blank lines. Confidence is the best source's score.
/// All sources passed in are echoed back on the answer so callers can
/// render attributions beyond what the body quotes.
pub fn synthesize(query: &str, sources: &[Source], params: &SynthesisParams) -> Answer {
    if sources.is_empty() {
        debug!(query, "no sources, returning fallback");
        return Answer {
            answer: FALLBACK_ANSWER.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
        };
    }

    let quoted = sources.len().min(params.max_sources.clamp(1, 3));
    let body = sources[..quoted]
        .iter()
        .map(|s| format!("From \"{}\": {}", s.doc_title, s.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");

    debug!(query, quoted, confidence = sources[0].score, "synthesized answer");

    Answer {
        answer: truncate_answer(body, params.max_answer_chars),
        sources: sources.to_vec(),
        confidence: sources[0].score,
    }
}

/// Cut `answer` to at most `max_chars` characters, marker included. A
/// bound too small to fit the marker gets a bare hard cut instead.
fn truncate_answer(answer: String, max_chars: usize) -> String {
    if answer.chars().count() <= max_chars {
        return answer;
    }
    let marker_chars = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_chars {
        return answer.chars().take(max_chars).collect();
    }
    let keep = max_chars - marker_chars;
    let cut = answer
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(answer.len());
    let mut out = answer[..cut].trim_end().to_string();
    out.push_str(TRUNCATION_MARKER);
    out
}
