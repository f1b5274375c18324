//! Configuration management for GenuinAI using the prefer crate.
//!
//! Layers, lowest to highest: built-in defaults, config file, environment
//! variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmConfig, LlmProvider};

/// Default address for the web UI.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Default cap on uploaded file size (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// `[server]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the web UI to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Largest accepted upload in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<usize>,
}

impl ServerConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "ServerConfig::is_default")]
    pub server: ServerConfig,
    /// Model provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover and load a `genuinai` config file in the standard locations.
    ///
    /// Falls back to defaults when nothing is found or the discovered file
    /// cannot be parsed.
    pub async fn load() -> Self {
        // prefer finds the file, serde parses it
        let path = match prefer::load("genuinai").await {
            Ok(found) => found.source_path().cloned(),
            Err(_) => None,
        };

        let Some(path) = path else {
            tracing::debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load_from_path(&path).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize for display; the API key is never included.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Effective runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub max_upload_bytes: usize,
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Apply file configuration.
    pub fn apply_config(&mut self, config: &Config) {
        if let Some(ref bind) = config.server.bind {
            self.bind = bind.clone();
        }
        if let Some(max) = config.server.max_upload_bytes {
            self.max_upload_bytes = max;
        }
        self.llm = config.llm.clone();
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// - `GENUINAI_BIND`: web UI address
    /// - `GENUINAI_MAX_UPLOAD_BYTES`: upload size cap
    /// - `LLM_*` and provider key variables, see [`LlmConfig::with_overrides_from`]
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply_env_settings(&lookup);
        self.resolve_api_key_from(&lookup);
    }

    fn apply_env_settings<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("GENUINAI_BIND").filter(|s| !s.is_empty()) {
            tracing::debug!("Using GENUINAI_BIND from environment: {}", bind);
            self.bind = bind;
        }
        if let Some(max) = lookup("GENUINAI_MAX_UPLOAD_BYTES").and_then(|s| s.parse().ok()) {
            self.max_upload_bytes = max;
        }
        self.llm = std::mem::take(&mut self.llm).with_setting_overrides_from(lookup);
    }

    /// Fill a missing API key from the current provider's variable.
    pub fn resolve_api_key_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm = std::mem::take(&mut self.llm).with_provider_key_from(lookup);
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, options: &LoadOptions) {
        if let Some(provider) = options.provider {
            tracing::debug!("Using provider from command line: {}", provider);
            self.llm.provider = provider;
        }
        if let Some(ref model) = options.model {
            self.llm.model = Some(model.clone());
        }
    }

    /// Build settings from every layer: defaults, `config`, variables read
    /// through `lookup`, then command-line options.
    ///
    /// The provider-specific API key is resolved last so it matches the
    /// provider the command line selected.
    pub fn layered<F>(config: &Config, options: &LoadOptions, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        settings.apply_config(config);
        settings.apply_env_settings(&lookup);
        settings.apply_cli(options);
        settings.resolve_api_key_from(&lookup);
        settings
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Provider chosen on the command line.
    pub provider: Option<LlmProvider>,
    /// Model chosen on the command line.
    pub model: Option<String>,
}

/// Expand `~` and environment references in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).as_ref()),
    }
}

/// Load settings with explicit options.
///
/// An explicit config path must load; a discovered one falls back to
/// defaults on error. Returns (Settings, Config).
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(&expand_path(path)).await?,
        None => Config::load().await,
    };

    let settings = Settings::layered(&config, &options, |key| std::env::var(key).ok());
    Ok((settings, config))
}
