//! # Prometheus Metrics
//!
//! Operational counters for the ledger. Scraped by Prometheus at `/metrics`
//! on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use pulse_ledger::storage::Block;

/// Holds all Prometheus metric handles for the node.
///
/// Prometheus handles are internally reference-counted, so clones share
/// the same underlying series.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Blocks committed through the write endpoint.
    pub blocks_appended_total: IntCounter,
    /// Candidates rejected by the validator, labelled by rule.
    pub blocks_rejected_total: IntCounterVec,
    /// Write requests whose body did not decode.
    pub malformed_requests_total: IntCounter,
    /// Current number of blocks in the chain, genesis included.
    pub chain_length: IntGauge,
    /// Time from decoded request to committed or rejected block.
    pub append_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("pulse".into()), None)
            .expect("failed to create prometheus registry");

        let blocks_appended_total = IntCounter::new(
            "blocks_appended_total",
            "Total number of blocks committed to the chain",
        )
        .expect("metric creation");
        registry
            .register(Box::new(blocks_appended_total.clone()))
            .expect("metric registration");

        let blocks_rejected_total = IntCounterVec::new(
            Opts::new(
                "blocks_rejected_total",
                "Total number of candidate blocks rejected by the validator",
            ),
            &["reason"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(blocks_rejected_total.clone()))
            .expect("metric registration");

        let malformed_requests_total = IntCounter::new(
            "malformed_requests_total",
            "Total number of write requests with an undecodable body",
        )
        .expect("metric creation");
        registry
            .register(Box::new(malformed_requests_total.clone()))
            .expect("metric registration");

        let chain_length = IntGauge::new("chain_length", "Number of blocks in the chain")
            .expect("metric creation");
        registry
            .register(Box::new(chain_length.clone()))
            .expect("metric registration");

        let append_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "append_latency_seconds",
                "Time spent building, validating, and committing a block",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(append_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            blocks_appended_total,
            blocks_rejected_total,
            malformed_requests_total,
            chain_length,
            append_latency_seconds,
        }
    }

    /// Records a committed block. The length gauge is taken from the
    /// block's own position, not from a separate read of the store.
    pub fn record_commit(&self, block: &Block) {
        self.blocks_appended_total.inc();
        let length = i64::try_from(block.index.saturating_add(1)).unwrap_or(i64::MAX);
        self.chain_length.set(length);
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_includes_prefixed_series() {
        let metrics = NodeMetrics::new();
        metrics.blocks_appended_total.inc();
        metrics.chain_length.set(2);
        metrics
            .blocks_rejected_total
            .with_label_values(&["index_mismatch"])
            .inc();

        let text = metrics.encode().expect("encode");
        assert!(text.contains("pulse_blocks_appended_total 1"));
        assert!(text.contains("pulse_chain_length 2"));
        assert!(text.contains("pulse_blocks_rejected_total{reason=\"index_mismatch\"} 1"));
    }

    #[test]
    fn commit_sets_length_from_block_position() {
        let metrics = NodeMetrics::new();
        let genesis = Block::genesis_at("2026-10-18T12:00:00.000000000Z");
        let first = Block::next(&genesis, 65);
        let second = Block::next(&first, 70);

        metrics.record_commit(&second);
        assert_eq!(metrics.chain_length.get(), 3);
        assert_eq!(metrics.blocks_appended_total.get(), 1);

        let mut last = second;
        last.index = u64::MAX;
        metrics.record_commit(&last);
        assert_eq!(metrics.chain_length.get(), i64::MAX);
    }
}
