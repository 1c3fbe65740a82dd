// ============================================================
// Layer 5 — ML / Inference Layer
// ============================================================
// Everything that touches burn or tokenizers lives here.
//
//   model.rs      — span encoder architecture (forward pass only)
//   inferencer.rs — TransformerBackend: checkpoint → answer span
//   keyword.rs    — KeywordBackend: sentence picking, no model files
//
// `load_backend` is the single place a BackendKind turns into a
// live backend. It runs once, at startup.

use std::path::Path;

use crate::domain::error::BackendError;
use crate::domain::traits::{BackendKind, InferenceBackend};
use crate::infra::checkpoint::CheckpointManager;

/// Span encoder architecture
pub mod model;

/// Transformer-backed inference
pub mod inferencer;

/// Keyword-overlap inference
pub mod keyword;

/// Device the transformer runs on when serving.
type InferBackend = burn::backend::Wgpu;

/// Build the backend selected by `kind`.
///
/// For `Transformer` this reads the tokenizer and weights from
/// `checkpoint_dir`, which can take a while on first use.
pub fn load_backend(
    kind:           BackendKind,
    checkpoint_dir: &Path,
) -> Result<Box<dyn InferenceBackend>, BackendError> {
    match kind {
        BackendKind::Transformer => {
            let ckpt   = CheckpointManager::new(checkpoint_dir);
            let device = burn::backend::wgpu::WgpuDevice::default();
            let backend = inferencer::TransformerBackend::<InferBackend>::load(&ckpt, device)?;
            Ok(Box::new(backend))
        }
        BackendKind::Keyword => Ok(Box::new(keyword::KeywordBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_backend_needs_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = load_backend(BackendKind::Keyword, dir.path()).unwrap();
        assert_eq!(backend.name(), "keyword");
    }

    #[test]
    fn test_transformer_without_checkpoint_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_backend(BackendKind::Transformer, dir.path()).err().unwrap();
        assert!(matches!(err, BackendError::ModelLoad { .. }));
    }
}
