//! Flow domain types consumed by the handshake layer.
//!
//! A `FlowVersion` is an immutable revision of a user workflow. This crate only
//! models the parts the handshake layer reads: identity, display name and the
//! trigger definition. Trigger settings are kept as raw JSON on the version
//! and decoded into [`TriggerSettings`] on demand, since non-block triggers
//! carry a different settings shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HandshakeError;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a flow (stable across versions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(pub String);

/// Identifier of the project that owns a flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Flow version
// ---------------------------------------------------------------------------

/// An immutable revision of a workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowVersion {
    /// Version identifier.
    pub id: String,
    /// The flow this version belongs to.
    pub flow_id: FlowId,
    /// Human-readable flow name.
    #[serde(default)]
    pub display_name: String,
    /// The trigger that starts this flow.
    pub trigger: FlowTrigger,
}

impl FlowVersion {
    /// Decode the block trigger settings embedded in this version.
    pub fn trigger_settings(&self) -> Result<TriggerSettings, HandshakeError> {
        self.trigger.block_settings()
    }
}

/// Kind of trigger a flow starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// A trigger provided by a block.
    Block,
    /// Placeholder trigger on a flow that has not been configured yet.
    Empty,
}

/// The trigger step of a flow version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTrigger {
    /// Step name of the trigger (e.g. "trigger").
    pub name: String,
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    /// Raw settings as stored with the flow version.
    #[serde(default)]
    pub settings: Value,
}

impl FlowTrigger {
    /// Trigger name selected in the raw settings, read without decoding them.
    ///
    /// `None` for `EMPTY` triggers and for missing, null or empty names.
    pub fn selected_trigger_name(&self) -> Option<&str> {
        if self.trigger_type == TriggerType::Empty {
            return None;
        }
        self.settings
            .get("triggerName")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Decode `settings` as block trigger settings.
    ///
    /// Fails when the settings are not an object or lack the block
    /// coordinates. A missing or empty `triggerName` is not an error.
    pub fn block_settings(&self) -> Result<TriggerSettings, HandshakeError> {
        let mut settings: TriggerSettings = serde_json::from_value(self.settings.clone())
            .map_err(|e| HandshakeError::InvalidTriggerSettings(e.to_string()))?;

        if settings.block_name.is_empty() {
            return Err(HandshakeError::InvalidTriggerSettings(
                "blockName must not be empty".to_string(),
            ));
        }
        if settings.block_version.is_empty() {
            return Err(HandshakeError::InvalidTriggerSettings(
                "blockVersion must not be empty".to_string(),
            ));
        }
        if settings.trigger_name.as_deref() == Some("") {
            settings.trigger_name = None;
        }

        Ok(settings)
    }
}

/// Block coordinates and trigger selection for a block trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSettings {
    /// Block package name (e.g. "slack").
    pub block_name: String,
    /// Pinned block version (e.g. "1.0.0").
    pub block_version: String,
    /// Trigger declared by the block. `None` until the user picks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<String>,
    /// User input for the trigger's properties.
    #[serde(default)]
    pub input: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
