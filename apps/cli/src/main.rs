//! snipkit CLI: builds render-ready snippet indexes from content collections.
//!
//! Discovers collection manifests, parses every snippet of every collection,
//! and writes one JSON index per collection for the page generator.

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
