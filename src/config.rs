//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\reading-tracker\config.toml
//! - macOS: ~/Library/Application Support/reading-tracker/config.toml
//! - Linux: ~/.config/reading-tracker/config.toml
//!
//! The config file is human-readable and editable. Every section is optional;
//! missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Keys accepted by [`Config::set`]
pub const SETTABLE_KEYS: &[&str] = &[
    "catalog.base_url",
    "catalog.covers_url",
    "catalog.timeout_secs",
    "catalog.user_agent",
    "catalog.search_limit",
    "chat.provider",
    "chat.api_key",
    "chat.model",
    "chat.base_url",
    "chat.max_tokens",
    "chat.temperature",
    "chat.timeout_secs",
    "library.database_path",
];

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Open Library access
    pub catalog: CatalogConfig,

    /// Reading assistant provider
    pub chat: ChatConfig,

    /// Local book storage
    pub library: LibraryConfig,
}

impl Config {
    /// Set one value by its dotted key, e.g. `chat.provider`.
    ///
    /// An empty value clears optional settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = || Some(value.to_string()).filter(|v| !v.is_empty());

        match key {
            "catalog.base_url" => self.catalog.base_url = value.to_string(),
            "catalog.covers_url" => self.catalog.covers_url = value.to_string(),
            "catalog.timeout_secs" => self.catalog.timeout_secs = parse_value(key, value)?,
            "catalog.user_agent" => self.catalog.user_agent = value.to_string(),
            "catalog.search_limit" => self.catalog.search_limit = parse_value(key, value)?,
            "chat.provider" => self.chat.provider = parse_value(key, value)?,
            "chat.api_key" => self.chat.api_key = optional(),
            "chat.model" => self.chat.model = optional(),
            "chat.base_url" => self.chat.base_url = optional(),
            "chat.max_tokens" => self.chat.max_tokens = parse_value(key, value)?,
            "chat.temperature" => self.chat.temperature = parse_value(key, value)?,
            "chat.timeout_secs" => self.chat.timeout_secs = parse_value(key, value)?,
            "library.database_path" => {
                self.library.database_path = optional().map(PathBuf::from)
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Catalog (Open Library) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API root for search, volumes and author records
    pub base_url: String,

    /// Root for cover and author photo images
    pub covers_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Default number of search hits to request
    pub search_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_url: crate::catalog::covers::DEFAULT_COVERS_URL.to_string(),
            timeout_secs: 10,
            user_agent: concat!(
                "ReadingTracker/",
                env!("CARGO_PKG_VERSION"),
                " (personal reading log)"
            )
            .to_string(),
            search_limit: 10,
        }
    }
}

/// Which chat backend answers the reading assistant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl ChatProviderKind {
    /// Hosted providers need an API key; a local Ollama does not.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl std::str::FromStr for ChatProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!(
                "unknown chat provider '{}' (expected openai, anthropic or ollama)",
                other
            )),
        }
    }
}

impl fmt::Display for ChatProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        })
    }
}

/// Reading assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub provider: ChatProviderKind,

    /// API key (can also come from the environment, see the CLI)
    pub api_key: Option<String>,

    /// Model name (empty = provider default)
    pub model: Option<String>,

    /// Override the provider's API root
    pub base_url: Option<String>,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: ChatProviderKind::default(),
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

/// Local library settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// SQLite database file (unset = `library.db` in the data directory)
    pub database_path: Option<PathBuf>,
}

impl LibraryConfig {
    /// Database file to open
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("reading-tracker"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("library.db")
        })
    }

    /// sqlx connection URL for the database file
    pub fn database_url(&self) -> String {
        format!(
            "sqlite:{}?mode=rwc",
            self.resolved_database_path().display()
        )
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reading-tracker"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

// ============================================================================
// Tests
// ============================================================================
