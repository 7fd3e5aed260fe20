//! pagegen CLI: build-time page generation for an MDX blog.
//!
//! Reads content documents, derives slugs, and writes the page and redirect
//! instructions a site renderer consumes.

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
