// CLI module for handling command-line interface

use crate::constants;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apkfetch", version)]
#[command(about = "Resolve and download Android APKs from third-party download sites")]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty apps.toml
    Init,
    /// Track an app
    Add {
        name: String,
        /// Base URL of the app on the download site
        source: String,
        /// Pin a version instead of following the latest release
        #[arg(long)]
        version: Option<String>,
        #[arg(long, default_value = constants::DEFAULT_DOWNLOADER)]
        downloader: String,
    },
    /// Stop tracking an app
    Remove { name: String },
    /// Download one app
    Fetch {
        name: String,
        /// Override the version pinned in apps.toml
        #[arg(long)]
        version: Option<String>,
        /// Resolve the download URL without downloading
        #[arg(long)]
        dry_run: bool,
    },
    /// Download every tracked app
    Sync {
        /// Resolve download URLs without downloading
        #[arg(long)]
        dry_run: bool,
    },
}
