// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. Running
// the binary with no arguments starts the web UI with defaults.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AskArgs, Commands, ServeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "quant-qa",
    version,
    about = "Quant AI Q&A bot: ask a question about a passage, in the browser or the terminal."
)]
pub struct Cli {
    /// What to run; defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Ask(args))   => run_ask(args),
            Some(Commands::Serve(args)) => run_serve(args),
            None                        => run_serve(ServeArgs::default()),
        }
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::application::serve_use_case::ServeUseCase;

    ServeUseCase::new(args.into()).execute()
}

fn run_ask(args: AskArgs) -> Result<()> {
    use crate::application::serve_use_case::load_bot;

    let bot = load_bot(&args.backend.into())?;
    let answer = bot.answer(&args.question, &args.context)?;
    println!("\nAnswer: {answer}");
    Ok(())
}
