//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.finchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The backend location is resolved once here; nothing else in the crate
//! knows a host or port.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FinchatConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub single_flight: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub session_id: Option<String>,
    pub single_flight: bool,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub session_id: Option<String>,
    pub single_flight: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.finchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".finchat").join("config.toml"))
}

/// Load config from `~/.finchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FinchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FinchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FinchatConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path (used by `--config`).
pub fn load_config_from(path: &Path) -> Result<FinchatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FinchatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FinchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# FinChat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"   # Or set FINCHAT_BASE_URL env var
# session_id = "my-session"            # Or set FINCHAT_SESSION_ID env var

# [chat]
# single_flight = false                # Reject new messages while a reply is pending
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FinchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
fn resolve_with_env(
    config: &FinchatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("FINCHAT_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Session ID: CLI → env → config → none
    let session_id = cli
        .session_id
        .clone()
        .or_else(|| env("FINCHAT_SESSION_ID"))
        .or_else(|| config.backend.session_id.clone())
        .filter(|s| !s.trim().is_empty());

    // The CLI flag can only turn the guard on
    let single_flight = cli.single_flight || config.chat.single_flight.unwrap_or(false);

    ResolvedConfig {
        base_url,
        session_id,
        single_flight,
    }
}

/// Generate a new UUID v4 session ID.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = FinchatConfig::default();
        assert!(config.backend.base_url.is_none());
        assert!(config.chat.single_flight.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&FinchatConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.session_id, None);
        assert!(!resolved.single_flight);
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = FinchatConfig {
            backend: BackendConfig {
                base_url: Some("http://10.0.0.5:9000".into()),
                session_id: Some("from-file".into()),
            },
            chat: ChatConfig {
                single_flight: Some(true),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "http://10.0.0.5:9000");
        assert_eq!(resolved.session_id.as_deref(), Some("from-file"));
        assert!(resolved.single_flight);
    }

    #[test]
    fn test_env_overrides_config() {
        let config = FinchatConfig {
            backend: BackendConfig {
                base_url: Some("http://file".into()),
                session_id: None,
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "FINCHAT_BASE_URL" => Some("http://env".to_string()),
            "FINCHAT_SESSION_ID" => Some("env-session".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "http://env");
        assert_eq!(resolved.session_id.as_deref(), Some("env-session"));
    }

    #[test]
    fn test_cli_wins_over_everything() {
        let config = FinchatConfig {
            backend: BackendConfig {
                base_url: Some("http://file".into()),
                session_id: Some("file".into()),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: Some("http://cli".into()),
            session_id: Some("cli".into()),
            single_flight: true,
        };
        let env = |_: &str| Some("env".to_string());
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.base_url, "http://cli");
        assert_eq!(resolved.session_id.as_deref(), Some("cli"));
        assert!(resolved.single_flight);
    }

    #[test]
    fn test_blank_session_id_is_dropped() {
        let cli = CliOverrides {
            session_id: Some("  ".into()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&FinchatConfig::default(), &cli, no_env);
        assert_eq!(resolved.session_id, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[backend]
base_url = "https://finchat.example.com"
session_id = "abc"

[chat]
single_flight = true
"#;
        let config: FinchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://finchat.example.com")
        );
        assert_eq!(config.backend.session_id.as_deref(), Some("abc"));
        assert_eq!(config.chat.single_flight, Some(true));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[backend]
base_url = "http://localhost:9999"
"#;
        let config: FinchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("http://localhost:9999"));
        assert!(config.backend.session_id.is_none());
        assert!(config.chat.single_flight.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("finchat-test-{}", new_session_id()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.backend.base_url.is_none());
        assert!(path.exists());

        // The generated file is all comments, so it parses to defaults
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.backend.base_url.is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("finchat-test-{}", new_session_id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[backend\nbase_url = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_new_session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
    }
}
