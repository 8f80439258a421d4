//! Technical-indicator engine CLI.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli::load_app_config(&cli.config)?;

    // Setup logging
    let log_level = match &cli.log_level {
        Some(level) => level.as_str(),
        None => config.logging.level.as_str(),
    };
    setup_logging(log_level, cli.json_logs || config.logging.is_json());

    // Execute command
    match cli.command {
        Commands::Compute(args) => cli::commands::compute::run(args, &config).await,
        Commands::Replay(args) => cli::commands::replay::run(args, &config).await,
        Commands::Indicators => cli::commands::indicators::run(&config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
