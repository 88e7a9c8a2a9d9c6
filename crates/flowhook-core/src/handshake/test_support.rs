//! In-memory fakes for the handshake ports, with call recording.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use secrecy::SecretString;
use serde_json::json;

use flowhook_types::block::{BlockMetadata, TriggerMetadata};
use flowhook_types::error::{EngineError, LookupError, WebhookUrlError};
use flowhook_types::execution::{ExecutionRequest, ExecutionResult};
use flowhook_types::flow::{FlowId, FlowTrigger, FlowVersion, TriggerType};
use flowhook_types::handshake::{HandshakeConfiguration, WebhookResponse};

use crate::ports::{BlockMetadataService, TriggerEngine, WebhookUrlResolver};

/// A slack flow version pinned to 1.0.0.
pub fn sample_flow_version(trigger_name: Option<&str>) -> FlowVersion {
    let mut settings = json!({
        "blockName": "slack",
        "blockVersion": "1.0.0",
        "input": {}
    });
    if let Some(name) = trigger_name {
        settings["triggerName"] = json!(name);
    }

    FlowVersion {
        id: "fv_1".to_string(),
        flow_id: FlowId::new("flow_1"),
        display_name: "Slack listener".to_string(),
        trigger: FlowTrigger {
            name: "trigger".to_string(),
            trigger_type: TriggerType::Block,
            settings,
        },
    }
}

/// Slack block metadata declaring `newMessage` with the given handshake.
pub fn slack_block(version: &str, handshake: Option<HandshakeConfiguration>) -> BlockMetadata {
    BlockMetadata {
        name: "slack".to_string(),
        version: version.to_string(),
        display_name: "Slack".to_string(),
        triggers: HashMap::from([(
            "newMessage".to_string(),
            TriggerMetadata {
                name: "newMessage".to_string(),
                display_name: "New Message".to_string(),
                handshake_configuration: handshake,
            },
        )]),
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

pub struct FakeMetadata {
    result: Result<BlockMetadata, LookupError>,
    hang: bool,
    calls: AtomicUsize,
    versions: Mutex<Vec<String>>,
}

impl FakeMetadata {
    pub fn returning(block: BlockMetadata) -> Self {
        Self {
            result: Ok(block),
            hang: false,
            calls: AtomicUsize::new(0),
            versions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: LookupError) -> Self {
        Self {
            result: Err(error),
            ..Self::returning(BlockMetadata::default())
        }
    }

    /// Never completes.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::returning(BlockMetadata::default())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_versions(&self) -> Vec<String> {
        self.versions.lock().unwrap().clone()
    }
}

impl BlockMetadataService for FakeMetadata {
    async fn get_block(
        &self,
        _token: &SecretString,
        _name: &str,
        version: &str,
    ) -> Result<BlockMetadata, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.versions.lock().unwrap().push(version.to_string());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct FakeEngine {
    result: Result<ExecutionResult, EngineError>,
    hang: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<ExecutionRequest>>,
}

impl FakeEngine {
    pub fn with_result(result: ExecutionResult) -> Self {
        Self {
            result: Ok(result),
            hang: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn responding(response: WebhookResponse) -> Self {
        Self::with_result(ExecutionResult {
            success: true,
            response: Some(response),
            message: None,
        })
    }

    pub fn failing(error: EngineError) -> Self {
        Self {
            result: Err(error),
            ..Self::with_result(ExecutionResult::default())
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::with_result(ExecutionResult::default())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ExecutionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl TriggerEngine for FakeEngine {
    async fn execute_trigger(
        &self,
        _token: &SecretString,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// Webhook URLs
// ---------------------------------------------------------------------------

pub struct FakeUrls {
    base: Result<String, WebhookUrlError>,
    simulate_flags: Mutex<Vec<bool>>,
}

impl FakeUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: Ok(base.to_string()),
            simulate_flags: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: WebhookUrlError) -> Self {
        Self {
            base: Err(error),
            simulate_flags: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.simulate_flags.lock().unwrap().len()
    }

    pub fn simulate_flags(&self) -> Vec<bool> {
        self.simulate_flags.lock().unwrap().clone()
    }
}

impl WebhookUrlResolver for FakeUrls {
    async fn get_webhook_url(
        &self,
        flow_id: &FlowId,
        simulate: bool,
    ) -> Result<String, WebhookUrlError> {
        self.simulate_flags.lock().unwrap().push(simulate);
        let base = self.base.clone()?;
        Ok(format!("{base}/{flow_id}"))
    }
}
