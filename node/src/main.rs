// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pulse Ledger Node
//!
//! Entry point for the `pulse-node` binary. Loads `.env`, parses CLI
//! arguments, initializes logging and metrics, mints the genesis block, and
//! serves the HTTP API.
//!
//! The binary supports two subcommands:
//!
//! - `run`    : start the node
//! - `version`: print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use pulse_ledger::storage::ChainStore;

use cli::{Commands, PulseNodeCli};
use logging::LogFormat;
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    // Populate the environment before clap reads its env fallbacks.
    let dotenv_path = dotenv::dotenv();
    let cli = PulseNodeCli::parse();

    match cli.command {
        Commands::Run(args) => {
            logging::init_logging(LogFormat::from_str_lossy(&args.log_format))
                .context("failed to install log subscriber")?;
            match &dotenv_path {
                Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
                Err(e) => tracing::debug!(error = %e, "no environment file loaded"),
            }
            run_node(args).await
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the node: API server and metrics endpoint, until a shutdown
/// signal arrives.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    tracing::info!(
        host = %args.host,
        port = args.port,
        metrics_port = args.metrics_port,
        request_timeout_secs = args.request_timeout_secs,
        max_body_bytes = args.max_body_bytes,
        "starting pulse-node"
    );

    // --- Chain store ---
    let chain = Arc::new(ChainStore::new());

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());
    node_metrics.chain_length.set(chain.len() as i64);

    // --- Application state ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            pulse_ledger::config::PROTOCOL_VERSION,
        ),
        chain,
        metrics: Arc::clone(&node_metrics),
    };
    let limits = api::ServiceLimits {
        request_timeout: args.request_timeout(),
        max_body_bytes: args.max_body_bytes,
    };

    // --- API server ---
    let api_router = api::create_router(app_state, limits);
    let api_addr = format!("{}:{}", args.host, args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("{}:{}", args.host, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            res.context("API server failed")?;
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            res.context("metrics server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("pulse-node stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("pulse-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol   {}", pulse_ledger::config::PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. If a handler cannot be
/// installed, that branch never resolves and the other one still applies.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
