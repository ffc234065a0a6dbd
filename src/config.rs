//! Configuration file support for GeoMark.
//!
//! Map setup, the account table and logging preferences, stored as JSON.
//! Markers are never part of the configuration.

use std::collections::BTreeMap;
use std::str::FromStr;

use geomark_core::{FormSize, StaticCredentials};
use serde::{Deserialize, Serialize};

use crate::map::MapSettings;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::all()
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidValue(format!("unknown log level '{}'", s)))
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub map: MapSettings,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub preferences: UserPreferences,
}

fn default_app_name() -> String {
    "GeoMark".to_string()
}

/// Account table. Placeholder credentials, compared in plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The one username that may place markers
    pub editor: String,
    /// username -> password
    pub users: BTreeMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut users = BTreeMap::new();
        users.insert("viewer".to_string(), "viewer123".to_string());
        users.insert("admin".to_string(), "123".to_string());
        Self {
            editor: "admin".to_string(),
            users,
        }
    }
}

impl AuthConfig {
    /// Build the credential verifier for this table.
    pub fn verifier(&self) -> StaticCredentials {
        StaticCredentials::new(self.users.clone(), self.editor.clone())
    }
}

/// Authoring form geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Size assumed until the form has been measured
    pub width: f32,
    pub height: f32,
}

impl Default for FormConfig {
    fn default() -> Self {
        let size = FormSize::default();
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl FormConfig {
    pub fn size(&self) -> FormSize {
        FormSize::new(self.width, self.height)
    }
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            map: MapSettings::default(),
            auth: AuthConfig::default(),
            form: FormConfig::default(),
            preferences: UserPreferences::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if !config.auth.users.contains_key(&config.auth.editor) {
            log::warn!(
                "Editor account '{}' is not in the user table; nobody can place markers",
                config.auth.editor
            );
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "geomark-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("geomark").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("geomark")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from an explicit file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "geomark-config";

    /// The page's localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, ConfigError> {
        web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("no window object".to_string()))?
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("{:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage is disabled".to_string()))
    }

    /// Try to load configuration from localStorage (WASM only).
    /// Returns Ok(None) when nothing has been stored yet.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Result<Option<Self>, ConfigError> {
        let stored = Self::local_storage()?
            .get_item(Self::LOCALSTORAGE_KEY)
            .map_err(|e| ConfigError::StorageError(format!("{:?}", e)))?;

        match stored {
            Some(json) => {
                let config = Self::from_json(&json)?;
                log::info!("Loaded configuration from localStorage");
                Ok(Some(config))
            }
            None => {
                log::debug!("No config found in localStorage");
                Ok(None)
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        Self::local_storage()?
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| ConfigError::StorageError(format!("{:?}", e)))?;
        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting has a value outside what it accepts
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Browser storage unavailable or refused the operation
    #[error("Storage error: {0}")]
    StorageError(String),
}
