// ============================================================
// Layer 6 — Checkpoint Loader
// ============================================================
// Restores a trained span encoder from disk.
//
// Expected directory layout:
//   checkpoints/
//     train_config.json     ← architecture hyperparameters
//     latest_epoch.json     ← optional, number of the last epoch saved
//     model_epoch_N.mpk.gz  ← weights when latest_epoch.json exists
//     model.mpk.gz          ← weights otherwise
//     tokenizer.json        ← see tokenizer_store.rs
//
// Weights are read with burn's CompactRecorder (gzipped
// MessagePack). The recorder adds the `.mpk.gz` extension itself,
// so paths here are built without it.

use std::{fs, path::PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::domain::error::BackendError;
use crate::ml::model::{SpanEncoder, SpanEncoderConfig};

const CONFIG_FILE: &str = "train_config.json";
const LATEST_EPOCH_FILE: &str = "latest_epoch.json";

/// Reads model artifacts out of one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Read and check the architecture the weights were trained with.
    pub fn load_config(&self) -> Result<SpanEncoderConfig, BackendError> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .map_err(|e| BackendError::model_load(path.display(), e))?;
        let cfg: SpanEncoderConfig = serde_json::from_str(&json)
            .map_err(|e| BackendError::model_load(path.display(), e))?;
        cfg.validate()
            .map_err(|reason| BackendError::model_load(path.display(), reason))?;
        Ok(cfg)
    }

    /// Weights file stem: the latest epoch if a pointer exists,
    /// otherwise the plain `model` stem.
    pub fn weights_path(&self) -> Result<PathBuf, BackendError> {
        let pointer = self.dir.join(LATEST_EPOCH_FILE);
        if !pointer.exists() {
            return Ok(self.dir.join("model"));
        }
        let s = fs::read_to_string(&pointer)
            .map_err(|e| BackendError::model_load(pointer.display(), e))?;
        let epoch: usize = serde_json::from_str(s.trim())
            .map_err(|e| BackendError::model_load(pointer.display(), e))?;
        Ok(self.dir.join(format!("model_epoch_{epoch}")))
    }

    /// Build the architecture from `cfg` and load the saved weights into it.
    pub fn load_model<B: Backend>(
        &self,
        cfg:    &SpanEncoderConfig,
        device: &B::Device,
    ) -> Result<SpanEncoder<B>, BackendError> {
        let path = self.weights_path()?;
        tracing::info!("Loading weights from '{}.mpk.gz'", path.display());

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| BackendError::model_load(path.display(), format!("{e:?}")))?;

        Ok(cfg.init::<B>(device).load_record(record))
    }

    /// Write a model and its config the way `load_model` expects them.
    #[cfg(test)]
    pub fn save_model<B: Backend>(
        &self,
        cfg:   &SpanEncoderConfig,
        model: &SpanEncoder<B>,
    ) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(CONFIG_FILE), serde_json::to_string_pretty(cfg)?)?;
        CompactRecorder::new()
            .record(model.clone().into_record(), self.dir.join("model"))
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn tiny_config() -> SpanEncoderConfig {
        SpanEncoderConfig {
            vocab_size: 20, max_seq_len: 16, d_model: 8,
            num_heads: 2, num_layers: 1, d_ff: 16,
        }
    }

    #[test]
    fn test_weights_path_without_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert_eq!(ckpt.weights_path().unwrap(), dir.path().join("model"));
    }

    #[test]
    fn test_weights_path_follows_latest_epoch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LATEST_EPOCH_FILE), "7").unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert_eq!(ckpt.weights_path().unwrap(), dir.path().join("model_epoch_7"));
    }

    #[test]
    fn test_missing_config_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckpointManager::new(dir.path()).load_config().unwrap_err();
        assert!(matches!(err, BackendError::ModelLoad { .. }));
    }

    #[test]
    fn test_saved_model_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let device = Default::default();
        let cfg = tiny_config();
        let ckpt = CheckpointManager::new(dir.path());

        let model = cfg.init::<NdArray>(&device);
        ckpt.save_model(&cfg, &model).unwrap();

        assert_eq!(ckpt.load_config().unwrap(), cfg);
        let loaded = ckpt.load_model::<NdArray>(&cfg, &device).unwrap();
        assert_eq!(loaded.layers.len(), 1);
    }

    #[test]
    fn test_missing_weights_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let device = Default::default();
        let result = CheckpointManager::new(dir.path())
            .load_model::<NdArray>(&tiny_config(), &device);
        assert!(matches!(result, Err(BackendError::ModelLoad { .. })));
    }
}
