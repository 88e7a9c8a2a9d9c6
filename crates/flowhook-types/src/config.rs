//! Configuration types for flowhook.
//!
//! `FlowhookConfig` mirrors `flowhook.toml`: where the collaborating services
//! live and how the handshake dispatcher bounds its calls. Every field has a
//! default so an empty or missing file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowhookConfig {
    #[serde(default)]
    pub services: ServiceConfig,
    #[serde(default)]
    pub handshake: HandshakeSettings,
}

/// Base URLs of the collaborating services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Internal API serving block metadata.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Trigger execution engine.
    #[serde(default = "default_engine_url")]
    pub engine_url: String,
    /// Public base URL webhook providers call back on.
    #[serde(default)]
    pub public_url: String,
    /// HTTP client timeout for service calls, in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_engine_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            engine_url: default_engine_url(),
            public_url: String::new(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// Dispatcher bounds and caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeSettings {
    /// Upper bound for the block metadata lookup.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// Upper bound for URL resolution plus engine execution.
    #[serde(default = "default_execution_timeout_ms")]
    pub execution_timeout_ms: u64,
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_lookup_timeout_ms() -> u64 {
    5_000
}

fn default_execution_timeout_ms() -> u64 {
    20_000
}

impl Default for HandshakeSettings {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
            execution_timeout_ms: default_execution_timeout_ms(),
            cache: CacheSettings::default(),
        }
    }
}

impl HandshakeSettings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_millis(self.execution_timeout_ms)
    }
}

/// Handshake configuration cache. Off unless enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Entry lifetime in seconds. `None` keeps entries until evicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}
