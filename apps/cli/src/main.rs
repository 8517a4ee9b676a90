//! quizbook CLI: regenerates the question README from the question corpus.
//!
//! Reads every featured question, extracts its TL;DR, and rewrites the
//! README's table of contents and question sections in place.

mod commands;

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
