//! CLI command definitions for the `flowhook` binary.

pub mod check;
pub mod output;
pub mod probe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Probe webhook payloads against flow triggers and their handshake rules.
#[derive(Parser)]
#[command(name = "flowhook", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to flowhook.toml (defaults to ~/.flowhook/flowhook.toml).
    #[arg(long, global = true, env = "FLOWHOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the handshake dispatcher for a payload against a flow version.
    Probe {
        /// JSON file holding the flow version.
        #[arg(long)]
        flow_version: PathBuf,

        /// JSON file holding the inbound payload (headers, queryParams, body).
        #[arg(long)]
        payload: PathBuf,

        /// Project that owns the flow.
        #[arg(long)]
        project_id: String,

        /// Engine token authorizing metadata and engine calls.
        #[arg(long, env = "FLOWHOOK_ENGINE_TOKEN", hide_env_values = true)]
        engine_token: Option<String>,

        /// Stop after detection; never execute the handshake hook.
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve a handshake configuration against a payload offline.
    Check {
        /// JSON file holding the handshake configuration (strategy, paramName).
        #[arg(long)]
        handshake: PathBuf,

        /// JSON file holding the inbound payload.
        #[arg(long)]
        payload: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
