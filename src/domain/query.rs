// ============================================================
// Layer 3 — Query Types
// ============================================================
// One request/response cycle of the bot:
//
//   QueryRequest  — what the user typed (question + context)
//   QueryResult   — what the backend found (answer span + score)
//
// Neither is persisted or cached. A QueryResult lives exactly as
// long as the call that produced it.

use serde::{Deserialize, Serialize};

/// A single submission from the UI or the JSON API.
///
/// Both fields are free text. Nothing here is validated: empty or
/// odd strings go to the backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural language question
    #[serde(default)]
    pub question: String,

    /// The passage the answer should be found in
    #[serde(default)]
    pub context: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context:  context.into(),
        }
    }
}

/// Structured output of a backend call.
///
/// `start` and `end` are byte offsets into the request's context,
/// so `&context[start..end]` is the span the backend pointed at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub score:  f32,
    pub start:  usize,
    pub end:    usize,
}

impl QueryResult {
    pub fn new(answer: impl Into<String>, score: f32, start: usize, end: usize) -> Self {
        Self { answer: answer.into(), score, start, end }
    }

    /// A result with no span, used when the backend found nothing.
    pub fn empty() -> Self {
        Self::new("", 0.0, 0, 0)
    }
}

/// A pre-filled question/context pair offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub question: &'static str,
    pub context:  &'static str,
}

/// Examples shown under the form, in display order.
pub const EXAMPLES: [Example; 2] = [
    Example {
        question: "What is the capital of France?",
        context:  "France is a country in Europe. The capital of France is Paris.",
    },
    Example {
        question: "What is Black-Scholes model?",
        context:  "The Black-Scholes model is a mathematical model for pricing options.",
    },
];

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_missing_fields_default_to_empty() {
        let req: QueryRequest = serde_json::from_str(r#"{"question": "Why?"}"#).unwrap();
        assert_eq!(req, QueryRequest::new("Why?", ""));
    }

    #[test]
    fn test_examples_contain_their_answers() {
        assert!(EXAMPLES[0].context.contains("Paris"));
        assert!(EXAMPLES[1].question.contains("Black-Scholes"));
    }
}
