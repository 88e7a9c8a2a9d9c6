//! Execution bridge: runs a matched handshake through the trigger engine.
//!
//! Always yields a concrete [`WebhookResponse`] when the engine could be
//! driven. A hook that fails, or succeeds without producing a response, is
//! answered with the fixed 500 fallback instead of surfacing an error.

use secrecy::SecretString;

use flowhook_types::error::HandshakeError;
use flowhook_types::execution::{ExecutionRequest, ExecutionResult};
use flowhook_types::flow::{FlowVersion, ProjectId};
use flowhook_types::handshake::{TriggerPayload, WebhookResponse};

use crate::ports::{TriggerEngine, WebhookUrlResolver};

/// Bridges matched handshakes into the trigger engine.
pub struct ExecutionBridge<E, U> {
    engine: E,
    urls: U,
}

impl<E: TriggerEngine, U: WebhookUrlResolver> ExecutionBridge<E, U> {
    pub fn new(engine: E, urls: U) -> Self {
        Self { engine, urls }
    }

    /// Execute the trigger's handshake hook for `payload`.
    ///
    /// URL resolution and engine transport failures propagate; hook failures
    /// become [`WebhookResponse::handshake_failure`].
    pub async fn execute_handshake(
        &self,
        token: &SecretString,
        flow_version: &FlowVersion,
        project_id: &ProjectId,
        payload: &TriggerPayload,
    ) -> Result<WebhookResponse, HandshakeError> {
        let webhook_url = self.urls.get_webhook_url(&flow_version.flow_id, false).await?;

        let request = ExecutionRequest::handshake(
            flow_version.clone(),
            payload.clone(),
            webhook_url,
            project_id.clone(),
        );

        let result = self.engine.execute_trigger(token, &request).await?;
        Ok(interpret_result(result))
    }
}

/// Map an engine result to the response sent back to the webhook caller.
pub fn interpret_result(result: ExecutionResult) -> WebhookResponse {
    match result {
        ExecutionResult {
            success: true,
            response: Some(response),
            ..
        } => response,
        ExecutionResult {
            success, message, ..
        } => {
            tracing::warn!(
                success,
                engine_message = message.as_deref().unwrap_or("<none>"),
                "handshake hook produced no usable response, sending fallback"
            );
            WebhookResponse::handshake_failure()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
