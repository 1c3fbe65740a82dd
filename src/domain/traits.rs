// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The bot only ever talks to an `InferenceBackend`. Which one
// sits behind it is decided once, at startup, from a
// `BackendKind`:
//
//   BackendKind::Transformer → ml::inferencer::TransformerBackend
//   BackendKind::Keyword     → ml::keyword::KeywordBackend
//
// Tests plug in their own stub implementations.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::BackendError;
use crate::domain::query::{QueryRequest, QueryResult};

// ─── InferenceBackend ─────────────────────────────────────────────────────────
/// Anything that can answer a question from a context passage.
///
/// Implementations are built once and then only read, so `infer`
/// takes `&self` and a backend must not keep per-request state.
pub trait InferenceBackend {
    /// Find the best answer span for `request`.
    fn infer(&self, request: &QueryRequest) -> Result<QueryResult, BackendError>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

// ─── BackendKind ──────────────────────────────────────────────────────────────
/// Which backend implementation to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Span-prediction transformer restored from a checkpoint directory
    #[default]
    Transformer,
    /// Sentence picker based on keyword overlap; needs no model files
    Keyword,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Transformer, BackendKind::Keyword];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Transformer => "transformer",
            BackendKind::Keyword     => "keyword",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "question-answering" is accepted as an alias of the default model
        match s.trim().to_ascii_lowercase().as_str() {
            "transformer" | "question-answering" => Ok(BackendKind::Transformer),
            "keyword"                            => Ok(BackendKind::Keyword),
            other => {
                let expected: Vec<&str> = BackendKind::ALL.iter().map(|k| k.as_str()).collect();
                Err(format!(
                    "unknown backend '{other}' (expected one of: {})",
                    expected.join(", ")
                ))
            }
        }
    }
}
