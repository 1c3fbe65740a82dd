// ============================================================
// Layer 2 — Serve Use Case
// ============================================================
// Startup sequence for the web UI:
//
//   Step 1: Load the selected backend       (Layer 5 - ml)
//   Step 2: Wrap it in a QaBot              (Layer 2)
//   Step 3: Bind the UI server              (Layer 1 - web)
//   Step 4: Serve until the process is killed
//
// Loading happens exactly once, before the socket is opened, so
// a broken checkpoint stops the process instead of failing every
// request.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::qa_bot::QaBot;
use crate::domain::traits::BackendKind;
use crate::ml::load_backend;
use crate::web::server::UiServer;

/// Which backend to load and where its artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub kind:           BackendKind,
    pub checkpoint_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind:           BackendKind::Transformer,
            checkpoint_dir: PathBuf::from("checkpoints"),
        }
    }
}

/// Everything `serve` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub backend: BackendConfig,
    pub host:    String,
    pub port:    u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            host:    "127.0.0.1".to_string(),
            port:    7860,
        }
    }
}

impl ServeConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the configured backend and wrap it in a bot.
///
/// This is the slow step (model weights, tokenizer); it is logged
/// on both sides so startup progress is visible.
pub fn load_bot(cfg: &BackendConfig) -> Result<QaBot> {
    tracing::info!(
        "Loading '{}' backend (checkpoint dir: '{}')...",
        cfg.kind,
        cfg.checkpoint_dir.display(),
    );
    let started = Instant::now();

    let backend = load_backend(cfg.kind, &cfg.checkpoint_dir)
        .with_context(|| format!("Cannot start the '{}' backend", cfg.kind))?;

    tracing::info!("Backend loaded in {:.1?}", started.elapsed());
    Ok(QaBot::new(backend))
}

pub struct ServeUseCase {
    config: ServeConfig,
}

impl ServeUseCase {
    pub fn new(config: ServeConfig) -> Self {
        Self { config }
    }

    /// Load, bind, then block serving requests.
    pub fn execute(&self) -> Result<()> {
        let bot = load_bot(&self.config.backend)?;
        let server = UiServer::bind(&self.config.addr())?;

        match server.local_addr() {
            Some(addr) => tracing::info!("Quant AI Q&A Bot running at http://{addr}/"),
            None       => tracing::info!("Quant AI Q&A Bot running on {}", self.config.addr()),
        }
        tracing::info!("Using the {} backend; press Ctrl+C to stop", bot.backend_name());

        server.run(&bot)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_classic_launch() {
        let cfg = ServeConfig::default();
        assert_eq!(cfg.addr(), "127.0.0.1:7860");
        assert_eq!(cfg.backend.kind, BackendKind::Transformer);
    }

    #[test]
    fn test_load_bot_with_keyword_backend() {
        let cfg = BackendConfig { kind: BackendKind::Keyword, ..Default::default() };
        let bot = load_bot(&cfg).unwrap();
        assert_eq!(bot.backend_name(), "keyword");
    }

    #[test]
    fn test_missing_checkpoint_is_fatal_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = ServeUseCase::new(ServeConfig {
            backend: BackendConfig {
                kind:           BackendKind::Transformer,
                checkpoint_dir: dir.path().join("missing"),
            },
            host: "127.0.0.1".into(),
            port: 0,
        });

        let err = use_case.execute().unwrap_err();
        assert!(err.to_string().contains("transformer"));
    }
}
