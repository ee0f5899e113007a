//! Configuration loading.
//!
//! A single optional `config.toml`; every table and field has a default, so an
//! empty file (or no file) is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Base-prompt cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// How many prior examples to include and how long each may be.
    #[serde(default)]
    pub examples: ExamplesConfig,

    /// Log filter defaults.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log filter defaults, used when `RUST_LOG` is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter for console-only runs.
    #[serde(default = "default_console_filter")]
    pub console_filter: String,

    /// Filter when a log directory is given.
    #[serde(default = "default_file_filter")]
    pub file_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_filter: default_console_filter(),
            file_filter: default_file_filter(),
        }
    }
}

/// Base-prompt cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached base prompt stays valid.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Limits on prior content examples included in final prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamplesConfig {
    /// Recent LinkedIn posts to include.
    #[serde(default = "default_linkedin_limit")]
    pub linkedin_limit: usize,

    /// Newsletter examples to include.
    #[serde(default = "default_newsletter_limit")]
    pub newsletter_limit: usize,

    /// Marketing examples to include.
    #[serde(default = "default_marketing_limit")]
    pub marketing_limit: usize,

    /// Characters kept from each example before truncation.
    #[serde(default = "default_max_example_chars")]
    pub max_example_chars: usize,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            linkedin_limit: default_linkedin_limit(),
            newsletter_limit: default_newsletter_limit(),
            marketing_limit: default_marketing_limit(),
            max_example_chars: default_max_example_chars(),
        }
    }
}

// Default value functions for serde

fn default_ttl_secs() -> u64 {
    600
}
fn default_linkedin_limit() -> usize {
    5
}
fn default_newsletter_limit() -> usize {
    3
}
fn default_marketing_limit() -> usize {
    3
}
fn default_max_example_chars() -> usize {
    3000
}
fn default_console_filter() -> String {
    "warn".to_owned()
}
fn default_file_filter() -> String {
    "pillarpost=debug,info".to_owned()
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load configuration from `path` if given, else from the default location if
/// it exists, else defaults.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return load_config(path);
    }
    let default_path = config_dir()?.join("config.toml");
    if default_path.exists() {
        load_config(&default_path)
    } else {
        Ok(Config::default())
    }
}

/// Resolve the default config directory (`~/.pillarpost/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".pillarpost"))
}
