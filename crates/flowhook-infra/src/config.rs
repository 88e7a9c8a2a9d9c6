//! Configuration loader for flowhook.
//!
//! Reads `flowhook.toml` (by default from `~/.flowhook/`) and deserializes it
//! into [`FlowhookConfig`]. Falls back to defaults when the file is missing or
//! malformed. Service URLs can be overridden from the environment.

use std::path::{Path, PathBuf};

use flowhook_types::config::FlowhookConfig;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "flowhook.toml";

/// Overrides `services.api_url`.
pub const ENV_API_URL: &str = "FLOWHOOK_API_URL";
/// Overrides `services.engine_url`.
pub const ENV_ENGINE_URL: &str = "FLOWHOOK_ENGINE_URL";
/// Overrides `services.public_url`.
pub const ENV_PUBLIC_URL: &str = "FLOWHOOK_PUBLIC_URL";

/// Resolve the configuration directory.
///
/// Priority:
/// 1. `FLOWHOOK_CONFIG_DIR` environment variable
/// 2. `~/.flowhook`
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FLOWHOOK_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".flowhook");
    }

    PathBuf::from(".flowhook")
}

/// Default path of `flowhook.toml`.
pub fn default_config_path() -> PathBuf {
    resolve_config_dir().join(CONFIG_FILE_NAME)
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`FlowhookConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(path: &Path) -> FlowhookConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return FlowhookConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return FlowhookConfig::default();
        }
    };

    match toml::from_str::<FlowhookConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            FlowhookConfig::default()
        }
    }
}

/// Load configuration from `path` and apply process environment overrides.
pub async fn load_config_with_env(path: &Path) -> FlowhookConfig {
    let mut config = load_config(path).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Overwrite service URLs with non-empty values returned by `lookup`.
pub fn apply_env_overrides(config: &mut FlowhookConfig, lookup: impl Fn(&str) -> Option<String>) {
    let services = &mut config.services;
    for (key, slot) in [
        (ENV_API_URL, &mut services.api_url),
        (ENV_ENGINE_URL, &mut services.engine_url),
        (ENV_PUBLIC_URL, &mut services.public_url),
    ] {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(key, "service URL overridden from environment");
            *slot = value;
        }
    }
}
