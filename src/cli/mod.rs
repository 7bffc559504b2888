//! CLI Module
//!
//! Command-line interface for malsori using Clap v4.

mod commands;
mod serve;

pub use commands::load_config;

use crate::config::Config;
use crate::romanize::RomanizationPolicy;
use anyhow::Result;
use clap::{Parser, Subcommand};

/// malsori - Korean pronunciation, romanization and speech service
#[derive(Parser, Debug)]
#[command(name = "malsori")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in .malsori/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address, overrides [server] bind
        #[arg(short, long)]
        bind: Option<String>,

        /// Listen port, overrides [server] port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the pronunciation and romanization of some Korean text
    Romanize {
        /// Text to romanize
        text: String,

        /// Output policy: per_syllable or whole_string
        #[arg(long)]
        policy: Option<RomanizationPolicy>,
    },

    /// Remove expired audio files once and exit
    Sweep,

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config {
        /// Show full configuration including secrets
        #[arg(short, long)]
        show_secrets: bool,
    },
}

/// Main CLI entry point
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        None => serve::cmd_serve(&config, None, None).await,
        Some(Commands::Serve { bind, port }) => serve::cmd_serve(&config, bind, port).await,
        Some(Commands::Romanize { text, policy }) => commands::cmd_romanize(&config, &text, policy),
        Some(Commands::Sweep) => commands::cmd_sweep(&config).await,
        Some(Commands::Init { force }) => commands::cmd_init(force),
        Some(Commands::Config { show_secrets }) => commands::cmd_config(&config, show_secrets),
    }
}
