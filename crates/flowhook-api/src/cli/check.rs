//! `flowhook check`: resolve a handshake configuration offline.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde_json::json;

use flowhook_core::handshake::strategy::resolve_handshake;
use flowhook_types::handshake::{HandshakeConfiguration, TriggerPayload};

use super::output::{check_mark, print_configuration, print_json, read_json};

/// Run the strategy resolver for `payload` without contacting any service.
pub async fn check(handshake_path: &Path, payload_path: &Path, json: bool) -> Result<()> {
    let config: HandshakeConfiguration = read_json(handshake_path, "handshake configuration").await?;
    let payload: TriggerPayload = read_json(payload_path, "payload").await?;

    let matched = resolve_handshake(&payload, Some(&config));
    tracing::debug!(matched, strategy = ?config.effective_strategy(), "offline handshake check");

    if json {
        return print_json(&json!({
            "handshake": matched,
            "strategy": config.effective_strategy(),
            "paramName": config.param_name(),
        }));
    }

    println!();
    if matched {
        println!("  {} Payload matches the handshake", check_mark(true));
    } else {
        println!("  {} Payload does not match the handshake", check_mark(false));
    }
    print_configuration(&config);
    if config.param_name().is_none() {
        println!("  {}", style("no paramName declared: never matches").yellow());
    }
    println!();
    Ok(())
}
