//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tunesync\config.toml
//! - macOS: ~/Library/Application Support/tunesync/config.toml
//! - Linux: ~/.config/tunesync/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup; credentials can also arrive via CLI flags/environment, which
//! take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::platform::ytmusic::DEFAULT_SERVICE_URL;
use crate::sync::{RetryPolicy, SyncConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Sync engine settings
    pub sync: SyncSettings,
}

/// Platform credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Spotify OAuth bearer token
    pub spotify_token: Option<String>,

    /// Base URL of the YouTube Music companion service
    pub ytmusic_service_url: Option<String>,
}

impl Credentials {
    /// Companion-service URL, falling back to the default local sidecar.
    pub fn ytmusic_url(&self) -> String {
        self.ytmusic_service_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
    }
}

/// Sync engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Pause between per-track search iterations, in milliseconds
    pub pacing_ms: u64,

    /// Whether unattended link syncs also approve the suggested candidate
    /// of each uncertain match
    pub auto_approve_uncertain: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            pacing_ms: 100,
            auto_approve_uncertain: true,
        }
    }
}

impl SyncSettings {
    /// Engine-level config derived from the file settings.
    pub fn engine_config(&self) -> SyncConfig {
        SyncConfig {
            pacing: Duration::from_millis(self.pacing_ms),
            creation_retry: RetryPolicy::default(),
            auto_approve_uncertain: self.auto_approve_uncertain,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunesync"))
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

/// Load configuration from a specific path (lenient, like [`load`]).
pub fn load_from(path: &std::path::Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
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
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

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
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[sync]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.spotify_token = Some("token-123".to_string());
        config.sync.pacing_ms = 250;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.credentials.spotify_token,
            Some("token-123".to_string())
        );
        assert_eq!(parsed.sync.pacing_ms, 250);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
spotify_token = "my-token"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified field is set
        assert_eq!(
            config.credentials.spotify_token,
            Some("my-token".to_string())
        );

        // Other fields use defaults
        assert_eq!(config.sync.pacing_ms, 100);
        assert!(config.sync.auto_approve_uncertain);
        assert_eq!(config.credentials.ytmusic_url(), "http://localhost:5001");
    }

    #[test]
    fn test_load_from_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.sync.pacing_ms, 100);
    }

    #[test]
    fn test_load_from_corrupt_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let config = load_from(&path);
        assert_eq!(config.sync.pacing_ms, 100);
    }

    #[test]
    fn test_engine_config_carries_pacing() {
        let settings = SyncSettings {
            pacing_ms: 42,
            auto_approve_uncertain: false,
        };
        let engine = settings.engine_config();
        assert_eq!(engine.pacing, Duration::from_millis(42));
        assert!(!engine.auto_approve_uncertain);
    }
}
