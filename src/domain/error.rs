use thiserror::Error;

/// Everything an inference backend can fail with.
///
/// The bot never wraps these: whatever the backend returns is what
/// the web layer (or the CLI) receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("cannot load model artifacts from '{path}': {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("tokenization failed: {0}")]
    Tokenize(String),

    #[error("input is {tokens} tokens long but the model accepts at most {limit}")]
    InputTooLong { tokens: usize, limit: usize },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl BackendError {
    pub fn model_load(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::ModelLoad { path: path.to_string(), reason: reason.to_string() }
    }
}
