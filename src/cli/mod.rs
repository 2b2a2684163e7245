//! CLI module for EmptyCut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// EmptyCut
///
/// Uploads a video to the processing service, which cuts out the segments
/// where nobody is in frame, and shows what was removed on a timeline.
#[derive(Parser, Debug)]
#[command(name = "emptycut")]
#[command(about = "EmptyCut - remove empty segments from videos with a remote processing service")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Origin of the processing service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// What a failed submission does to an earlier result (keep, clear)
    #[arg(long, global = true)]
    pub failure_policy: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a video and show the processed result
    Process(args::ProcessArgs),
    /// Render the removed-segment timeline for known segments
    Timeline(args::TimelineArgs),
    /// List the processing parameters and their bounds
    Fields,
}
