//! CLI argument definitions for the `msgbridge` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "msgbridge",
    version,
    about = "Query/mutation API in front of a conversation service"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the API server and the background poll loop
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 4000)]
        port: u16,

        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Override the background refresh period (milliseconds)
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Override the upstream store base URL
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Verify connectivity to the upstream store
    Check {
        /// Override the upstream store base URL
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Generate shell completions
    Completions { shell: Shell },
}
