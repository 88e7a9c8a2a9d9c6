//! Block metadata as returned by the block metadata service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::handshake::HandshakeConfiguration;

/// A versioned block and the triggers it declares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub display_name: String,
    /// Trigger name -> trigger metadata.
    #[serde(default)]
    pub triggers: HashMap<String, TriggerMetadata>,
}

impl BlockMetadata {
    /// Handshake configuration declared by `trigger_name`, if any.
    pub fn handshake_configuration(&self, trigger_name: &str) -> Option<&HandshakeConfiguration> {
        self.triggers
            .get(trigger_name)
            .and_then(|trigger| trigger.handshake_configuration.as_ref())
    }
}

/// Metadata for a single trigger declared by a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handshake_configuration: Option<HandshakeConfiguration>,
}
