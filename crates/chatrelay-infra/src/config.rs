//! Relay configuration loader.
//!
//! Reads `relay.toml` (from `{data_dir}/relay.toml` by default) and
//! deserializes it into [`RelayConfig`]. Falls back to defaults when the file
//! is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use chatrelay_types::config::{BackendConfig, RelayConfig};
use chatrelay_types::error::ConfigError;
use chatrelay_types::llm::BackendKind;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RELAY_DATA_DIR";

const CONFIG_FILE_NAME: &str = "relay.toml";

/// Resolve the data directory: `$RELAY_DATA_DIR`, else `~/.chatrelay`.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    match override_dir.filter(|d| !d.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatrelay"),
    }
}

/// Default config file location inside a data directory.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Load relay configuration from `path`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_relay_config(path: &Path) -> RelayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No relay.toml found at {}, using defaults", path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            RelayConfig::default()
        }
    }
}

/// Read the backend API token from the environment variable named in `backend`.
///
/// Workers AI always needs a token. OpenAI-compatible servers may run
/// without one (local inference servers), so a missing variable yields `None`.
pub fn resolve_api_token(backend: &BackendConfig) -> Result<Option<SecretString>, ConfigError> {
    token_from(backend, std::env::var(&backend.api_token_env).ok())
}

fn token_from(
    backend: &BackendConfig,
    value: Option<String>,
) -> Result<Option<SecretString>, ConfigError> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(token) => Ok(Some(SecretString::from(token))),
        None if backend.kind == BackendKind::WorkersAi => {
            Err(ConfigError::MissingEnv(backend.api_token_env.clone()))
        }
        None => Ok(None),
    }
}
