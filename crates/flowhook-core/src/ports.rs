//! Collaborator traits (ports) consumed by the handshake layer.
//!
//! The infrastructure layer (flowhook-infra) implements these over HTTP;
//! tests substitute in-memory fakes. Uses native async fn in traits (Rust
//! 2024 edition, no async_trait macro).

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;

use flowhook_types::block::BlockMetadata;
use flowhook_types::error::{EngineError, LookupError, WebhookUrlError};
use flowhook_types::execution::{ExecutionRequest, ExecutionResult};
use flowhook_types::flow::FlowId;

/// Versioned block metadata lookup.
pub trait BlockMetadataService: Send + Sync {
    /// Fetch a block at a concrete, pinned version.
    fn get_block(
        &self,
        token: &SecretString,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<BlockMetadata, LookupError>> + Send;
}

/// The sandboxed engine that runs trigger hooks.
pub trait TriggerEngine: Send + Sync {
    /// Run a trigger hook and report its result.
    ///
    /// `Err` means the engine could not be driven at all. A hook that ran and
    /// failed is reported as `Ok` with `success: false`.
    fn execute_trigger(
        &self,
        token: &SecretString,
        request: &ExecutionRequest,
    ) -> impl Future<Output = Result<ExecutionResult, EngineError>> + Send;
}

/// Resolves the public callback URL of a flow's webhook.
pub trait WebhookUrlResolver: Send + Sync {
    /// `simulate` selects the test-mode URL used while building a flow.
    fn get_webhook_url(
        &self,
        flow_id: &FlowId,
        simulate: bool,
    ) -> impl Future<Output = Result<String, WebhookUrlError>> + Send;
}

impl<T: BlockMetadataService> BlockMetadataService for Arc<T> {
    fn get_block(
        &self,
        token: &SecretString,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<BlockMetadata, LookupError>> + Send {
        T::get_block(self, token, name, version)
    }
}

impl<T: TriggerEngine> TriggerEngine for Arc<T> {
    fn execute_trigger(
        &self,
        token: &SecretString,
        request: &ExecutionRequest,
    ) -> impl Future<Output = Result<ExecutionResult, EngineError>> + Send {
        T::execute_trigger(self, token, request)
    }
}

impl<T: WebhookUrlResolver> WebhookUrlResolver for Arc<T> {
    fn get_webhook_url(
        &self,
        flow_id: &FlowId,
        simulate: bool,
    ) -> impl Future<Output = Result<String, WebhookUrlError>> + Send {
        T::get_webhook_url(self, flow_id, simulate)
    }
}
