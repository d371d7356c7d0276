//! travelkb CLI — travel-destination knowledge-base builder.
//!
//! Queries DBpedia for countries and capitals, crawls travel-guide pages
//! for activity attributes, and writes a Prolog fact file for the travel
//! suggester's inference engine.

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
