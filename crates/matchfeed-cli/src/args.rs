use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{LogLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "matchfeed")]
#[command(about = "Replay and inspect dating feed pagination", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $MATCHFEED_PATH, then the system data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Walk a recorded feed with a swipe script")]
    Replay {
        /// Recording file: {"pages": [{"users": [...], "recommendedCount": N}, ...]}
        #[arg(long)]
        pages: PathBuf,

        /// Swipe script, one character per gesture: 'u' (next) or 'd' (previous)
        #[arg(long, default_value = "")]
        swipes: String,

        /// Override the configured page size
        #[arg(long)]
        batch_size: Option<usize>,
    },

    #[command(about = "Manage the cached user location")]
    Location {
        #[command(subcommand)]
        command: LocationCommand,
    },

    #[command(about = "Profile status tags")]
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
}

#[derive(Subcommand)]
pub enum LocationCommand {
    #[command(about = "Print the cached location")]
    Show,

    #[command(about = "Cache a location")]
    Set {
        /// ISO country code, e.g. "by"
        #[arg(long)]
        country: String,

        #[arg(long)]
        country_name: String,

        #[arg(long)]
        city: String,

        /// Required for cities split into districts
        #[arg(long)]
        district: Option<String>,
    },

    #[command(about = "Remove the cached location")]
    Clear,
}

#[derive(Subcommand)]
pub enum StatusCommand {
    #[command(about = "List status tags with their badges")]
    List,
}
