//! HTTP client for the block metadata service.
//!
//! Fetches a block at a pinned version from
//! `GET {api_url}/v1/engine/blocks/{blockName}?version={version}`, authorized
//! with the engine token as a bearer credential. The token is only exposed
//! when building the `Authorization` header.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use flowhook_core::ports::BlockMetadataService;
use flowhook_types::block::BlockMetadata;
use flowhook_types::config::ServiceConfig;
use flowhook_types::error::LookupError;

use crate::http;

/// [`BlockMetadataService`] over the internal HTTP API.
pub struct HttpBlockMetadataClient {
    client: reqwest::Client,
    api_url: String,
}

impl HttpBlockMetadataClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            api_url: api_url.into(),
        }
    }

    pub fn from_config(services: &ServiceConfig) -> Self {
        Self::new(
            services.api_url.clone(),
            Duration::from_millis(services.http_timeout_ms),
        )
    }

    /// URL of `name` at `version`.
    pub fn block_url(&self, name: &str, version: &str) -> Result<Url, LookupError> {
        let mut url = http::join_segments(&self.api_url, &["v1", "engine", "blocks", name])
            .map_err(LookupError::Unavailable)?;
        url.query_pairs_mut().append_pair("version", version);
        Ok(url)
    }
}

impl BlockMetadataService for HttpBlockMetadataClient {
    async fn get_block(
        &self,
        token: &SecretString,
        name: &str,
        version: &str,
    ) -> Result<BlockMetadata, LookupError> {
        let url = self.block_url(name, version)?;
        tracing::debug!(block = name, version, %url, "fetching block metadata");

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = http::error_body(response).await;
            return Err(status_error(status, name, version, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LookupError::Unavailable(format!("failed to read response: {e}")))?;
        decode_block(&bytes)
    }
}

/// Map a non-success status to a lookup error.
fn status_error(status: StatusCode, name: &str, version: &str, body: &str) -> LookupError {
    match status {
        StatusCode::NOT_FOUND => LookupError::NotFound {
            name: name.to_string(),
            version: version.to_string(),
        },
        _ => LookupError::Unavailable(format!("HTTP {status}: {body}")),
    }
}

fn decode_block(bytes: &[u8]) -> Result<BlockMetadata, LookupError> {
    serde_json::from_slice(bytes)
        .map_err(|e| LookupError::InvalidResponse(format!("failed to parse block metadata: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowhook_types::handshake::HandshakeStrategy;

    fn client(api_url: &str) -> HttpBlockMetadataClient {
        HttpBlockMetadataClient::new(api_url, Duration::from_secs(1))
    }

    #[test]
    fn test_block_url() {
        let url = client("http://127.0.0.1:3000/").block_url("slack", "1.0.0").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/v1/engine/blocks/slack?version=1.0.0"
        );
    }

    #[test]
    fn test_block_url_encodes_scoped_names() {
        let url = client("http://127.0.0.1:3000")
            .block_url("@flowhook/block-slack", "0.3.1-beta.1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/v1/engine/blocks/@flowhook%2Fblock-slack?version=0.3.1-beta.1"
        );
    }

    #[test]
    fn test_block_url_invalid_base() {
        let err = client("").block_url("slack", "1.0.0").unwrap_err();
        assert!(matches!(err, LookupError::Unavailable(_)));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "slack", "1.0.0", ""),
            LookupError::NotFound { ref name, ref version } if name == "slack" && version == "1.0.0"
        ));

        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "slack", "1.0.0", "maintenance");
        assert!(matches!(err, LookupError::Unavailable(ref msg) if msg.contains("maintenance")));

        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "slack", "1.0.0", ""),
            LookupError::Unavailable(_)
        ));
    }

    #[test]
    fn test_decode_block() {
        let block = decode_block(
            br#"{
                "name": "slack",
                "version": "1.0.0",
                "triggers": {
                    "newMessage": {
                        "name": "newMessage",
                        "handshakeConfiguration": {
                            "strategy": "BODY_PARAM_PRESENT",
                            "paramName": "challenge"
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let config = block.handshake_configuration("newMessage").unwrap();
        assert_eq!(config.effective_strategy(), HandshakeStrategy::BodyParamPresent);
        assert_eq!(config.param_name(), Some("challenge"));
    }

    #[test]
    fn test_decode_block_invalid_body() {
        assert!(matches!(
            decode_block(b"<html>bad gateway</html>"),
            Err(LookupError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = client("http://127.0.0.1:9");
        let err = client
            .get_block(&SecretString::from("token"), "slack", "1.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Unavailable(_)));
    }
}
