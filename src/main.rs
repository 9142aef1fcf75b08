// Event Countdown
// Main entry point

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = cli::Cli::parse();
    log::debug!("Starting Event Countdown");

    cli::run(cli)
}
