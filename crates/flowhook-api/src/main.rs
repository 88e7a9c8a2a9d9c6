//! flowhook CLI entry point.
//!
//! Binary name: `flowhook`
//!
//! Parses CLI arguments, initializes tracing and configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use flowhook_observe::tracing_setup::{init_tracing, shutdown_tracing, TracingOptions};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither tracing nor configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "flowhook", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        verbosity: cli.verbose,
        json: cli.json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Probe {
            flow_version,
            payload,
            project_id,
            engine_token,
            dry_run,
        } => {
            let state = AppState::init(cli.config.as_deref()).await?;
            cli::probe::probe(
                &state,
                cli::probe::ProbeArgs {
                    flow_version: &flow_version,
                    payload: &payload,
                    project_id,
                    engine_token,
                    dry_run,
                },
                cli.json,
            )
            .await?;
        }

        Commands::Check { handshake, payload } => {
            cli::check::check(&handshake, &payload, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
