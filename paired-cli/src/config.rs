// ABOUTME: Configuration file loading, validation, and hierarchical merging for the paired CLI
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{anyhow, Context, Result};
use paired_sdk::constants::urls::DEFAULT_RESOURCE_BASE;
use paired_sdk::{HandshakeWait, ResourceEndpoints, Strategy};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "validate_strategy")]
    pub strategy: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub handshake_timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "validate_format")]
    pub preferred_format: Option<String>,
}

/// Output format for fetch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Fully resolved settings after config files and environment are applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoints: ResourceEndpoints,
    pub strategy: Strategy,
    pub timeout: Option<Duration>,
    pub handshake_wait: HandshakeWait,
    pub format: Format,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_path()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths, lowest precedence first
    pub fn load_from_paths(paths: &[&Path]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let file_config = Self::load_from_file(path)?;
            log::debug!("Loaded config from {}", path.display());
            config = config.merge(file_config);
        }

        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join(constants::config::APP_DIR)
                    .join(constants::config::FILE_NAME),
            );
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(config_home)
                    .join(constants::config::APP_DIR)
                    .join(constants::config::FILE_NAME),
            );
        }

        // 3. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(constants::config::PROJECT_FILE));
        }

        paths.dedup();
        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            base_url: other.base_url.or(self.base_url),
            strategy: other.strategy.or(self.strategy),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            handshake_timeout_secs: other.handshake_timeout_secs.or(self.handshake_timeout_secs),
            preferred_format: other.preferred_format.or(self.preferred_format),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref base_url) = self.base_url {
            ResourceEndpoints::new(base_url)?;
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        if self.handshake_timeout_secs == Some(0) {
            return Err(anyhow!("handshake_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Resolve into settings, applying the base URL environment override
    pub fn settings(&self) -> Result<Settings> {
        let base_url = std::env::var(constants::env::BASE_URL)
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_RESOURCE_BASE.to_string());

        let strategy = match self.strategy.as_deref() {
            Some(name) => name.parse()?,
            None => Strategy::default(),
        };

        let format = match self.preferred_format.as_deref() {
            Some("json") => Format::Json,
            _ => Format::Text,
        };

        Ok(Settings {
            endpoints: ResourceEndpoints::new(&base_url)
                .with_context(|| format!("Invalid base URL from {}", base_source(&base_url, self)))?,
            strategy,
            timeout: self.timeout_secs.map(Duration::from_secs),
            handshake_wait: self
                .handshake_timeout_secs
                .map(|secs| HandshakeWait::Bounded(Duration::from_secs(secs)))
                .unwrap_or_default(),
            format,
        })
    }
}

fn base_source(base_url: &str, config: &Config) -> &'static str {
    if config.base_url.as_deref() == Some(base_url) {
        "config file"
    } else if base_url == DEFAULT_RESOURCE_BASE {
        "built-in default"
    } else {
        constants::env::BASE_URL
    }
}

// Custom deserializer for strategy validation
fn validate_strategy<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref name) = value {
        name.parse::<Strategy>().map_err(D::Error::custom)?;
    }
    Ok(value)
}

// Custom deserializer for format validation
fn validate_format<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        Some(format) if !constants::OUTPUT_FORMATS.contains(&format) => {
            Err(D::Error::custom(format!(
                "Invalid format '{}'. Must be one of: {}",
                format,
                constants::OUTPUT_FORMATS.join(", ")
            )))
        }
        _ => Ok(value),
    }
}
