//! Application state wiring the dispatcher to its HTTP collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowhook_core::handshake::HandshakeDispatcher;
use flowhook_infra::config::{default_config_path, load_config_with_env};
use flowhook_infra::engine::HttpTriggerEngine;
use flowhook_infra::metadata::HttpBlockMetadataClient;
use flowhook_infra::webhook_url::ConfiguredWebhookUrlResolver;
use flowhook_types::config::FlowhookConfig;

/// Dispatcher pinned to the HTTP adapters.
pub type ConcreteDispatcher =
    HandshakeDispatcher<HttpBlockMetadataClient, HttpTriggerEngine, ConfiguredWebhookUrlResolver>;

/// Shared application state used by the CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FlowhookConfig>,
    pub config_path: PathBuf,
    pub dispatcher: Arc<ConcreteDispatcher>,
}

impl AppState {
    /// Load configuration and wire the dispatcher.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let config = load_config_with_env(&config_path).await;
        tracing::debug!(
            path = %config_path.display(),
            api_url = %config.services.api_url,
            engine_url = %config.services.engine_url,
            "configuration loaded"
        );

        let dispatcher = Self::build_dispatcher(&config);

        Ok(Self {
            config: Arc::new(config),
            config_path,
            dispatcher: Arc::new(dispatcher),
        })
    }

    fn build_dispatcher(config: &FlowhookConfig) -> ConcreteDispatcher {
        HandshakeDispatcher::new(
            HttpBlockMetadataClient::from_config(&config.services),
            HttpTriggerEngine::from_config(&config.services),
            ConfiguredWebhookUrlResolver::from_config(&config.services),
        )
        .with_settings(&config.handshake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_with_missing_config_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("flowhook.toml");
        let state = AppState::init(Some(&path)).await.unwrap();

        assert_eq!(state.config_path, path);
        assert!(state.dispatcher.cache().is_none());
        assert_eq!(
            state.dispatcher.options().lookup_timeout,
            state.config.handshake.lookup_timeout()
        );
    }

    #[tokio::test]
    async fn test_init_enables_cache_from_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("flowhook.toml");
        tokio::fs::write(&path, "[handshake.cache]\nenabled = true\n")
            .await
            .unwrap();

        let state = AppState::init(Some(&path)).await.unwrap();
        assert!(state.dispatcher.cache().is_some());
    }
}
