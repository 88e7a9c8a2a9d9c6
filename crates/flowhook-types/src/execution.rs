//! Wire types exchanged with the trigger execution engine.

use serde::{Deserialize, Serialize};

use crate::flow::{FlowVersion, ProjectId};
use crate::handshake::{TriggerPayload, WebhookResponse};

/// Which trigger hook the engine should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerHookType {
    OnEnable,
    OnDisable,
    Handshake,
    Renew,
    Run,
    Test,
}

/// Request to execute a trigger hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub hook_type: TriggerHookType,
    pub flow_version: FlowVersion,
    pub trigger_payload: TriggerPayload,
    pub webhook_url: String,
    pub test: bool,
    pub project_id: ProjectId,
}

impl ExecutionRequest {
    /// A live (non-test) handshake hook request.
    pub fn handshake(
        flow_version: FlowVersion,
        trigger_payload: TriggerPayload,
        webhook_url: String,
        project_id: ProjectId,
    ) -> Self {
        Self {
            hook_type: TriggerHookType::Handshake,
            flow_version,
            trigger_payload,
            webhook_url,
            test: false,
            project_id,
        }
    }
}

/// What the engine reports after running a hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<WebhookResponse>,
    /// Engine-side diagnostic, usually set when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowId, FlowTrigger, TriggerType};
    use serde_json::json;

    #[test]
    fn test_handshake_request_wire_shape() {
        let request = ExecutionRequest::handshake(
            FlowVersion {
                id: "fv_1".to_string(),
                flow_id: FlowId::new("flow_1"),
                display_name: String::new(),
                trigger: FlowTrigger {
                    name: "trigger".to_string(),
                    trigger_type: TriggerType::Block,
                    settings: json!({}),
                },
            },
            TriggerPayload::default(),
            "https://hooks.example.com/v1/webhooks/flow_1".to_string(),
            ProjectId::new("proj_1"),
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["hookType"], json!("HANDSHAKE"));
        assert_eq!(value["test"], json!(false));
        assert_eq!(value["projectId"], json!("proj_1"));
        assert_eq!(value["flowVersion"]["flowId"], json!("flow_1"));
        assert_eq!(
            value["webhookUrl"],
            json!("https://hooks.example.com/v1/webhooks/flow_1")
        );
    }

    #[test]
    fn test_execution_result_without_response() {
        let result: ExecutionResult =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(result.success);
        assert!(result.response.is_none());
    }
}
