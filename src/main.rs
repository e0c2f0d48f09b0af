//! `islandsim`: headless driver for the island engine.
//!
//! Loads scene content and a timed input script, replays the script against
//! the engine frame by frame and prints a JSON report of every action the
//! engine emitted plus the final camera and discovery state.

mod config;
mod error;
mod script;
mod sim;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, SimConfig};
use crate::error::SimError;

#[tokio::main]
async fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_cli(Cli::parse());
    let simulation = sim::load(&config)?;
    let report = if config.realtime { simulation.run_realtime().await? } else { simulation.run()? };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
