use std::fmt;

use thiserror::Error;

/// Errors from the block metadata service.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("block '{name}' version '{version}' not found")]
    NotFound { name: String, version: String },

    #[error("block version '{0}' is not a concrete version")]
    InvalidVersion(String),

    #[error("block metadata service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid block metadata response: {0}")]
    InvalidResponse(String),
}

/// Errors from the trigger execution engine transport.
///
/// An engine that answers with `success: false` is not an error; that case is
/// recovered into a fallback response by the execution bridge.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("engine unreachable: {0}")]
    Unreachable(String),

    #[error("engine rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
}

/// Errors resolving a flow's public webhook URL.
#[derive(Debug, Clone, Error)]
pub enum WebhookUrlError {
    #[error("public webhook base URL is not configured")]
    NotConfigured,

    #[error("invalid webhook URL: {0}")]
    Invalid(String),
}

/// Suspension point of a dispatch, used to classify timeouts and cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Lookup,
    Execution,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStage::Lookup => f.write_str("lookup"),
            DispatchStage::Execution => f.write_str("execution"),
        }
    }
}

/// Hard failures of a handshake dispatch.
///
/// "Not a handshake" is never an error; see `HandshakeOutcome`.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("invalid trigger settings: {0}")]
    InvalidTriggerSettings(String),

    #[error("block metadata lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("webhook URL resolution failed: {0}")]
    WebhookUrl(#[from] WebhookUrlError),

    #[error("handshake execution failed: {0}")]
    Engine(#[from] EngineError),

    #[error("handshake {stage} timed out after {timeout_ms}ms")]
    Timeout { stage: DispatchStage, timeout_ms: u64 },

    #[error("handshake cancelled during {stage}")]
    Cancelled { stage: DispatchStage },
}
