use anyhow::Result;
use clap::Parser;
use malsori::{cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    // Until the config file is read, log at the level chosen by flag or env
    let mut log_config = logging::LogConfig::new().with_debug_mode(cli_args.debug);
    if let Ok(level) = std::env::var("MALSORI_LOG_LEVEL") {
        log_config = log_config.with_level(level);
    }
    if let Ok(log_dir) = std::env::var("MALSORI_LOG_DIR") {
        log_config = log_config.with_log_dir(std::path::PathBuf::from(log_dir));
    }

    let config = logging::with_bootstrap_logging(&log_config, || {
        cli::load_config(cli_args.config.as_deref())
    })?;

    let log_config = log_config
        .with_level(config.logging.level.clone())
        .with_log_file(config.logging.file.clone());

    let _guard = logging::init_logging(log_config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Clean up old log files (keep last 7 days)
    if cli_args.debug
        && let Ok(removed) = logging::cleanup_old_logs(log_config.log_dir(), 7)
        && removed > 0
    {
        tracing::info!("🧹 Cleaned up {} old log file(s)", removed);
    }

    cli::run(cli_args, config).await
}
