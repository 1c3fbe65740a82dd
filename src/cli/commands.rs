// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands:
//   serve — start the web UI (the default with no subcommand)
//   ask   — answer one question on the terminal
//
// Conversions into the application-layer configs live here, so
// nothing below Layer 1 ever sees a clap type.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::serve_use_case::{BackendConfig, ServeConfig};
use crate::domain::traits::BackendKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Q&A web form (default)
    Serve(ServeArgs),

    /// Answer a single question and print the result
    Ask(AskArgs),
}

/// Backend selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Inference backend: `transformer` (trained checkpoint) or
    /// `keyword` (sentence matching, no model files)
    #[arg(long, default_value = "transformer")]
    pub backend: BackendKind,

    /// Directory holding tokenizer.json, train_config.json and weights
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,
}

impl Default for BackendArgs {
    fn default() -> Self {
        let cfg = BackendConfig::default();
        Self { backend: cfg.kind, checkpoint_dir: cfg.checkpoint_dir }
    }
}

impl From<BackendArgs> for BackendConfig {
    fn from(a: BackendArgs) -> Self {
        BackendConfig {
            kind:           a.backend,
            checkpoint_dir: a.checkpoint_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Interface to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 7860)]
    pub port: u16,
}

impl Default for ServeArgs {
    fn default() -> Self {
        let cfg = ServeConfig::default();
        Self { backend: BackendArgs::default(), host: cfg.host, port: cfg.port }
    }
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            backend: a.backend.into(),
            host:    a.host,
            port:    a.port,
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// The question to answer
    #[arg(long)]
    pub question: String,

    /// Passage containing the answer
    #[arg(long)]
    pub context: String,
}
