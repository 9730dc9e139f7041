//! # CLI Interface
//!
//! Defines the command-line argument structure for `pulse-node` using
//! `clap` derive. Every `run` flag has an environment fallback, and `main`
//! loads a `.env` file before parsing so those variables can live there.

use clap::{Parser, Subcommand};
use std::time::Duration;

use pulse_ledger::config::{
    DEFAULT_API_PORT, DEFAULT_MAX_BODY_BYTES, DEFAULT_METRICS_PORT, DEFAULT_REQUEST_TIMEOUT,
};

/// Pulse ledger node.
///
/// Holds a single in-memory chain of readings and serves it over HTTP:
/// `GET /` returns the chain, `POST /` appends a reading.
#[derive(Parser, Debug)]
#[command(
    name = "pulse-node",
    about = "In-memory hash-linked ledger of pulse readings",
    version,
    propagate_version = true
)]
pub struct PulseNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the node and serve the ledger API.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Interface to bind both listeners on.
    #[arg(long, env = "PULSE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the ledger API. Read from `ADDR` for compatibility with
    /// existing deployments.
    #[arg(long, short = 'p', env = "ADDR", default_value_t = DEFAULT_API_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "PULSE_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "PULSE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PULSE_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "PULSE_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl RunArgs {
    /// The request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
