//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

use crate::romanize::RomanizationPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote provider credentials
    #[serde(default)]
    pub providers: ProviderConfigs,

    /// Romanization output policy
    #[serde(default)]
    pub romanization: RomanizationConfig,

    /// Text-to-speech and audio artifact retention
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Easy-Korean rewriting
    #[serde(default)]
    pub simplify: SimplifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "0.0.0.0")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public hostname used to build artifact links behind a proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_hostname: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            external_hostname: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log to file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfigs {
    /// OpenAI configuration (TTS and chat completions)
    #[serde(default)]
    pub openai: Option<ProviderConfig>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (usually supplied through the environment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Chat model used when `[simplify] model` is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RomanizationConfig {
    #[serde(default)]
    pub policy: RomanizationPolicy,
}

/// How `/speak` hands audio back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechDelivery {
    /// JSON body with an absolute artifact URL
    #[default]
    Url,
    /// The mp3 bytes themselves
    Stream,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_tts_model")]
    pub model: String,

    #[serde(default = "default_tts_voice")]
    pub voice: String,

    /// Directory holding generated audio
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    #[serde(default)]
    pub delivery: SpeechDelivery,

    /// Artifacts older than this are removed by the sweeper
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tts_model() -> String {
    "gpt-4o-mini-tts".to_string()
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("tts_files")
}

fn default_retention_secs() -> u64 {
    86_400
}

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: default_tts_model(),
            voice: default_tts_voice(),
            audio_dir: default_audio_dir(),
            delivery: SpeechDelivery::default(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f64 {
    0.3
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SimplifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: <config_dir>/malsori/config.toml
    /// 3. Local config: ./malsori.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::from_file(&system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::from_file(&local_config_path)?;
        }

        config = Self::apply_env_overrides(config)?;

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply the environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let config = Self::from_file(path)?;

        Self::apply_env_overrides(config)
    }

    /// `<config_dir>/malsori/config.toml`
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("malsori").join("config.toml"))
    }

    /// `./malsori.toml`
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("./malsori.toml")
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(config: Self) -> Result<Self> {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the process environment in
    /// production, a map in tests)
    fn apply_overrides<F>(mut config: Self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("MALSORI_BIND") {
            config.server.bind = bind;
        }

        if let Some(port) = lookup("MALSORI_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid MALSORI_PORT: {port}"))?;
        }

        if let Some(host) = lookup("EXTERNAL_HOSTNAME").filter(|h| !h.trim().is_empty()) {
            config.server.external_hostname = Some(host);
        }

        if let Some(level) = lookup("MALSORI_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("MALSORI_LOG_FILE") {
            config.logging.file = Some(PathBuf::from(file));
        }

        if let Some(policy) = lookup("MALSORI_ROMANIZATION_POLICY") {
            config.romanization.policy = policy
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid MALSORI_ROMANIZATION_POLICY")?;
        }

        if let Some(dir) = lookup("MALSORI_AUDIO_DIR") {
            config.speech.audio_dir = PathBuf::from(dir);
        }

        if let Some(api_key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.providers.openai.get_or_insert_with(Default::default).api_key = Some(api_key);
        }

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config.providers.openai.get_or_insert_with(Default::default).base_url = Some(base_url);
        }

        Ok(config)
    }

    /// The OpenAI API key, or an error naming how to provide it
    pub fn require_api_key(&self) -> Result<&str> {
        self.providers
            .openai
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
            .context("OPENAI_API_KEY is not set (export it, add it to .env, or set [providers.openai] api_key)")
    }

    pub fn openai_base_url(&self) -> &str {
        self.providers
            .openai
            .as_ref()
            .and_then(|p| p.base_url.as_deref())
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    /// `[simplify] model`, else the provider default, else `gpt-4o-mini`
    pub fn chat_model(&self) -> String {
        self.simplify
            .model
            .clone()
            .or_else(|| {
                self.providers
                    .openai
                    .as_ref()
                    .and_then(|p| p.default_model.clone())
            })
            .unwrap_or_else(default_chat_model)
    }

    /// Root used in artifact links: `https://<external_hostname>` when set,
    /// otherwise `http://localhost:<port>`
    pub fn public_base_url(&self) -> String {
        match self.server.external_hostname.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => {
                let host = host
                    .trim_start_matches("https://")
                    .trim_start_matches("http://")
                    .trim_end_matches('/');
                format!("https://{host}")
            }
            _ => format!("http://localhost:{}", self.server.port),
        }
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if !(0.0..=2.0).contains(&self.simplify.temperature) {
            anyhow::bail!(
                "Invalid simplify temperature: {}. Must be between 0.0 and 2.0",
                self.simplify.temperature
            );
        }

        if self.simplify.max_tokens == 0 {
            anyhow::bail!("simplify.max_tokens must be greater than zero");
        }

        if self.speech.timeout_secs == 0 || self.simplify.timeout_secs == 0 {
            anyhow::bail!("Remote call timeouts must be greater than zero");
        }

        if self.speech.sweep_interval_secs == 0 {
            anyhow::bail!("speech.sweep_interval_secs must be greater than zero");
        }

        // Swept `.part` files must be older than any in-flight write
        if self.speech.retention_secs == 0
            || self.speech.retention_secs < self.speech.timeout_secs
        {
            anyhow::bail!(
                "speech.retention_secs ({}) must be at least speech.timeout_secs ({})",
                self.speech.retention_secs,
                self.speech.timeout_secs
            );
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Copy with the API key replaced by a mask, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(openai) = config.providers.openai.as_mut()
            && let Some(key) = openai.api_key.as_mut()
        {
            *key = mask_secret(key);
        }
        config
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}
