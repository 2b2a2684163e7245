//! EmptyCut CLI
//!
//! Uploads a video to the processing service, which removes the segments
//! where nobody is in frame, then shows the result and what was cut.
//!
//! # Usage
//!
//! ```bash
//! emptycut process --input talk.mp4 --min-area 0.05 --skip-frames 20 --download out/
//! emptycut timeline --duration 10 --segment 2,5 --position 4
//! emptycut fields
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use emptycut_cli::adapters::{LogLevel, TracingLogAdapter};
use emptycut_cli::cli::{commands, Cli, Commands};
use emptycut_cli::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the EmptyCut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolution = initialize_configuration_hierarchy(&cli)?;
    TracingLogAdapter::init(LogLevel::parse(&resolution.config.log_level)?, cli.log_json)?;

    info!("Starting EmptyCut CLI");
    resolution.log_summary();
    let config = resolution.config;

    match cli.command {
        Commands::Process(args) => {
            info!("Executing process command");
            commands::process(args, &config).await?;
        }
        Commands::Timeline(args) => {
            info!("Executing timeline command");
            commands::timeline(args)?;
        }
        Commands::Fields => {
            commands::fields()?;
        }
    }

    info!("EmptyCut CLI completed successfully");
    Ok(())
}
