//! Scribe CLI: interactive, research-backed document generation.
//!
//! Walks an outline section by section with an LLM, checkpointing after every
//! part, and exports the result as markdown plus a converted rich document.

mod commands;
mod console;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
