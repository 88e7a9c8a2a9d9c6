//! HTTP client for the trigger execution engine.
//!
//! Runs trigger hooks via `POST {engine_url}/v1/engine/execute-trigger`. An
//! engine that answers and reports a failed hook is a successful call here;
//! only transport problems and rejected requests are errors.

use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use flowhook_core::ports::TriggerEngine;
use flowhook_types::config::ServiceConfig;
use flowhook_types::error::EngineError;
use flowhook_types::execution::{ExecutionRequest, ExecutionResult};

use crate::http;

/// [`TriggerEngine`] over the engine's HTTP API.
pub struct HttpTriggerEngine {
    client: reqwest::Client,
    engine_url: String,
}

impl HttpTriggerEngine {
    pub fn new(engine_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            engine_url: engine_url.into(),
        }
    }

    pub fn from_config(services: &ServiceConfig) -> Self {
        Self::new(
            services.engine_url.clone(),
            Duration::from_millis(services.http_timeout_ms),
        )
    }

    pub fn execute_url(&self) -> Result<Url, EngineError> {
        http::join_segments(&self.engine_url, &["v1", "engine", "execute-trigger"])
            .map_err(EngineError::Unreachable)
    }
}

impl TriggerEngine for HttpTriggerEngine {
    async fn execute_trigger(
        &self,
        token: &SecretString,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, EngineError> {
        let url = self.execute_url()?;
        tracing::debug!(
            hook_type = ?request.hook_type,
            flow_id = %request.flow_version.flow_id,
            %url,
            "executing trigger hook"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = http::error_body(response).await;
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Unreachable(format!("failed to read response: {e}")))?;
        decode_result(&bytes)
    }
}

fn decode_result(bytes: &[u8]) -> Result<ExecutionResult, EngineError> {
    serde_json::from_slice(bytes)
        .map_err(|e| EngineError::InvalidResponse(format!("failed to parse engine result: {e}")))
}
