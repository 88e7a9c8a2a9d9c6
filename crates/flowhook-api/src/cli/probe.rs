//! `flowhook probe`: run the dispatcher against the configured services.

use std::path::Path;

use anyhow::{Context, Result};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use flowhook_core::handshake::HandshakeRequest;
use flowhook_types::flow::{FlowVersion, ProjectId};
use flowhook_types::handshake::TriggerPayload;

use super::output::{
    decision_json, outcome_json, print_decision, print_json, print_outcome, print_services,
    read_json,
};
use crate::state::AppState;

/// Inputs of a probe run.
pub struct ProbeArgs<'a> {
    pub flow_version: &'a Path,
    pub payload: &'a Path,
    pub project_id: String,
    pub engine_token: Option<String>,
    pub dry_run: bool,
}

/// Detect, and unless `dry_run` execute, the handshake for a payload.
///
/// Ctrl+C cancels an in-flight dispatch.
pub async fn probe(state: &AppState, args: ProbeArgs<'_>, json: bool) -> Result<()> {
    let token = engine_token(args.engine_token)?;
    let flow_version: FlowVersion = read_json(args.flow_version, "flow version").await?;
    let payload: TriggerPayload = read_json(args.payload, "payload").await?;
    let project_id = ProjectId::new(args.project_id);

    let services = &state.config.services;
    tracing::info!(
        config = %state.config_path.display(),
        api_url = %services.api_url,
        engine_url = %services.engine_url,
        dry_run = args.dry_run,
        "probing handshake"
    );
    if !json {
        print_services(&state.config_path, services);
    }

    let request = HandshakeRequest {
        flow_version: &flow_version,
        project_id: &project_id,
        payload: &payload,
    };

    if args.dry_run {
        let decision = state
            .dispatcher
            .detect(&token, request)
            .await
            .context("handshake detection failed")?;
        if json {
            return print_json(&decision_json(&decision));
        }
        print_decision(&decision);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let result = state
        .dispatcher
        .try_handshake_with_cancel(&token, request, &cancel)
        .await;
    watcher.abort();

    let outcome = result.context("handshake dispatch failed")?;
    if json {
        return print_json(&outcome_json(&outcome));
    }
    print_outcome(&outcome);
    Ok(())
}

fn engine_token(raw: Option<String>) -> Result<SecretString> {
    match raw {
        Some(token) if !token.trim().is_empty() => Ok(SecretString::from(token)),
        _ => anyhow::bail!("an engine token is required (--engine-token or FLOWHOOK_ENGINE_TOKEN)"),
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("interrupt received, cancelling handshake");
        cancel.cancel();
    }
}
