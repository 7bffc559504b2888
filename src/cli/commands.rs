//! CLI subcommands: romanize, sweep, init, config, and config loading.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::romanize::{RomanizationPipeline, RomanizationPolicy};
use crate::speech::ArtifactStore;

/// Load configuration from file or defaults
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    config.validate()?;

    Ok(config)
}

/// Print pronunciation and romanization of `text`
pub(crate) fn cmd_romanize(
    config: &Config,
    text: &str,
    policy: Option<RomanizationPolicy>,
) -> Result<()> {
    let policy = policy.unwrap_or(config.romanization.policy);
    let pipeline = RomanizationPipeline::korean(policy);
    let result = pipeline.run(text).context("Romanization failed")?;

    println!("Input:         {}", text);
    println!("Pronunciation: {}", result.pronunciation);
    println!("Romanized:     {}", result.romanized);
    println!("Policy:        {}", policy);

    Ok(())
}

/// Run one retention pass over the audio directory
pub(crate) async fn cmd_sweep(config: &Config) -> Result<()> {
    let store = ArtifactStore::new(&config.speech.audio_dir);

    println!(
        "🧹 Removing audio older than {}s from {}...\n",
        config.speech.retention_secs,
        store.dir().display()
    );

    let removed = store
        .sweep(config.speech.retention())
        .await
        .context("Retention sweep failed")?;

    if removed > 0 {
        println!("✅ Removed {} audio file(s)", removed);
    } else {
        println!("✅ No expired audio files");
    }

    Ok(())
}

/// Write a default `./malsori.toml`
pub(crate) fn cmd_init(force: bool) -> Result<()> {
    println!("malsori configuration initialization\n");

    let config_path = Config::local_config_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("✅ Configuration initialized at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set OPENAI_API_KEY in your environment or .env");
    println!("   2. Adjust [speech] and [romanization] if needed");
    println!("   3. Run 'malsori serve' to start the server");

    Ok(())
}

/// Show effective configuration
pub(crate) fn cmd_config(config: &Config, show_secrets: bool) -> Result<()> {
    let shown = if show_secrets {
        config.clone()
    } else {
        config.redacted()
    };

    let toml_string = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    println!("{}", toml_string);
    println!("# Public base URL: {}", config.public_base_url());

    if !show_secrets {
        println!("\n💡 Use --show-secrets to display API keys");
    }

    Ok(())
}
