//! docsource CLI — front matter source map for documentation sites.
//!
//! Scans a docs content tree once per process and serves the slug → source
//! file mapping used by the broken-link checker to deduplicate pages.

mod commands;
mod server;

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
