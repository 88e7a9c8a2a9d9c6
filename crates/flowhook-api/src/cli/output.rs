//! Input loading and rendering shared by the commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use flowhook_types::config::ServiceConfig;
use flowhook_types::handshake::{
    HandshakeConfiguration, HandshakeDecision, HandshakeOutcome, WebhookResponse,
};

/// Read and decode a JSON document, naming `what` in errors.
pub async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what} in {}", path.display()))
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn decision_json(decision: &HandshakeDecision) -> Value {
    match decision {
        HandshakeDecision::Matched(config) => json!({
            "handshake": true,
            "strategy": config.effective_strategy(),
            "paramName": config.param_name(),
        }),
        HandshakeDecision::Skip(reason) => json!({
            "handshake": false,
            "reason": reason,
        }),
    }
}

pub fn outcome_json(outcome: &HandshakeOutcome) -> Value {
    match outcome {
        HandshakeOutcome::Responded(response) => json!({
            "handshake": true,
            "response": response,
        }),
        HandshakeOutcome::NotHandshake => json!({ "handshake": false }),
    }
}

pub fn check_mark(ok: bool) -> String {
    if ok {
        format!("{}", style("✓").green())
    } else {
        format!("{}", style("✗").red())
    }
}

/// Where the probe reads its configuration and which services it calls.
pub fn print_services(config_path: &Path, services: &ServiceConfig) {
    println!();
    println!("  {}", style("── Services ──").dim());
    println!("  Config:   {}", style(config_path.display()).dim());
    println!("  Metadata: {}", style(&services.api_url).cyan());
    println!("  Engine:   {}", style(&services.engine_url).cyan());
    let public_url = if services.public_url.is_empty() {
        "<not configured>"
    } else {
        services.public_url.as_str()
    };
    println!("  Public:   {}", style(public_url).cyan());
}

pub fn print_decision(decision: &HandshakeDecision) {
    println!();
    match decision {
        HandshakeDecision::Matched(config) => {
            println!("  {} Handshake detected", check_mark(true));
            print_configuration(config);
            println!("  {}", style("dry run: hook not executed").dim());
        }
        HandshakeDecision::Skip(reason) => {
            println!("  {} Not a handshake", check_mark(false));
            println!("  Reason:   {}", style(format!("{reason:?}")).yellow());
        }
    }
    println!();
}

pub fn print_outcome(outcome: &HandshakeOutcome) {
    println!();
    match outcome {
        HandshakeOutcome::Responded(response) => {
            println!("  {} Handshake answered", check_mark(response.status < 400));
            print_response(response);
        }
        HandshakeOutcome::NotHandshake => {
            println!("  {} Not a handshake", check_mark(false));
            println!(
                "  {}",
                style("the request continues with normal trigger processing").dim()
            );
        }
    }
    println!();
}

pub fn print_configuration(config: &HandshakeConfiguration) {
    println!(
        "  Strategy: {}",
        style(format!("{:?}", config.effective_strategy())).cyan()
    );
    println!(
        "  Param:    {}",
        style(config.param_name().unwrap_or("<none>")).cyan()
    );
}

fn print_response(response: &WebhookResponse) {
    let status = if response.status < 400 {
        style(response.status).green()
    } else {
        style(response.status).red()
    };
    println!("  Status:   {status}");
    for (name, value) in &response.headers {
        println!("  Header:   {}: {}", style(name).dim(), value);
    }
    let body = serde_json::to_string_pretty(&response.body).unwrap_or_default();
    println!("  Body:");
    for line in body.lines() {
        println!("    {line}");
    }
}
