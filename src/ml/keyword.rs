// ============================================================
// Layer 5 — Keyword Backend
// ============================================================
// A model-free backend: the answer is the context sentence that
// shares the most (length-weighted) question terms.
//
//   "What is the capital of France?"
//     terms: capital(7), france(6)
//   "France is a country in Europe."     → 6 / 13
//   "The capital of France is Paris."    → 13 / 13  ← answer
//
// Useful for running the UI without model files, and as a
// baseline to compare the transformer against.

use crate::domain::error::BackendError;
use crate::domain::query::{QueryRequest, QueryResult};
use crate::domain::traits::InferenceBackend;

const STOP_WORDS: [&str; 16] = [
    "what", "when", "where", "which", "who", "why", "how", "does",
    "will", "this", "that", "have", "from", "the", "and", "are",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordBackend;

impl KeywordBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceBackend for KeywordBackend {
    fn infer(&self, request: &QueryRequest) -> Result<QueryResult, BackendError> {
        let terms = key_terms(&request.question);
        let total_weight: usize = terms.iter().map(|t| t.len()).sum();
        if total_weight == 0 {
            return Ok(QueryResult::empty());
        }

        let mut best: Option<(usize, (usize, usize))> = None;
        for (start, end) in sentence_spans(&request.context) {
            let sentence = request.context[start..end].to_lowercase();
            let weight: usize = terms.iter()
                .filter(|t| contains_word(&sentence, t))
                .map(|t| t.len())
                .sum();
            // strictly greater: ties keep the earliest sentence
            if weight > 0 && best.map_or(true, |(w, _)| weight > w) {
                best = Some((weight, (start, end)));
            }
        }

        Ok(match best {
            Some((weight, (start, end))) => QueryResult::new(
                &request.context[start..end],
                weight as f32 / total_weight as f32,
                start,
                end,
            ),
            None => QueryResult::empty(),
        })
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Lowercased question words with edge punctuation trimmed,
/// minus stop words. Words of 1–2 letters only survive if numeric
/// (so "2" in "Term 2" is kept).
fn key_terms(question: &str) -> Vec<String> {
    let mut terms: Vec<String> = question.split_whitespace()
        .map(|w| w.to_lowercase()
            .trim_matches(|c: char| c.is_ascii_punctuation())
            .to_string())
        .filter(|w| !w.is_empty()
            && !STOP_WORDS.contains(&w.as_str())
            && (w.len() > 2 || w.chars().all(|c| c.is_ascii_digit())))
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Byte ranges of the sentences in `text`, whitespace trimmed.
///
/// A sentence ends after `.`, `!` or `?` when followed by
/// whitespace or the end of text (so "3.5%" stays whole), or at a
/// newline.
fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut begin = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = match c {
            '\n' => Some(i),
            '.' | '!' | '?' => match chars.peek() {
                None => Some(i + 1),
                Some((_, next)) if next.is_whitespace() => Some(i + 1),
                _ => None,
            },
            _ => None,
        };
        if let Some(end) = end {
            push_trimmed(text, begin, end, &mut spans);
            begin = end;
        }
    }
    push_trimmed(text, begin, text.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, begin: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let slice = &text[begin..end];
    let trimmed = slice.trim_start();
    let start = begin + (slice.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        spans.push((start, start + trimmed.len()));
    }
}

/// Whole-word substring test: `word` must be bounded by
/// non-alphanumeric bytes or the ends of `text`.
/// Keeps "how" from matching inside "showcase".
fn contains_word(text: &str, word: &str) -> bool {
    let tb = text.as_bytes();
    let wb = word.as_bytes();
    let wl = wb.len();
    if wl == 0 || wl > tb.len() { return false; }
    (0..=tb.len() - wl).any(|i| {
        &tb[i..i + wl] == wb
            && (i == 0 || !tb[i - 1].is_ascii_alphanumeric())
            && (i + wl == tb.len() || !tb[i + wl].is_ascii_alphanumeric())
    })
}
