//! # REST API
//!
//! Builds the axum router that exposes the ledger over HTTP. All endpoints
//! share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path      | Description                               |
//! |--------|-----------|-------------------------------------------|
//! | GET    | `/`       | Full chain, genesis first                 |
//! | POST   | `/`       | Append one reading: `{"payload": <int>}`  |
//! | GET    | `/health` | Liveness probe                            |
//!
//! ## Write lifecycle
//!
//! ```text
//! Received → Decoded → CandidateBuilt → Validated → Committed | Rejected
//! ```
//!
//! Each request runs to a terminal state before the response is written.
//! The candidate is built from a tip snapshot; if another writer commits in
//! between, the store rejects the stale candidate and the client gets a 409
//! telling it to resubmit.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use pulse_ledger::config::{DEFAULT_MAX_BODY_BYTES, DEFAULT_REQUEST_TIMEOUT};
use pulse_ledger::storage::{Block, ChainError, ChainStore, RejectReason};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The canonical chain. Owns its own lock.
    pub chain: Arc<ChainStore>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

/// Transport-level limits applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct ServiceLimits {
    /// Requests running longer than this get a 408.
    pub request_timeout: Duration,
    /// Bodies larger than this get a 413.
    pub max_body_bytes: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, tracing, and
/// transport limits.
pub fn create_router(state: AppState, limits: ServiceLimits) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(chain_handler).post(write_handler))
        .route("/health", get(health_handler))
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteRequest {
    /// The reading to record.
    pub payload: i64,
}

/// Error body for requests that never reached the core.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeErrorResponse {
    /// Decoder message.
    pub error: String,
    /// The raw request body, lossily decoded as UTF-8.
    pub body: String,
}

/// Error body for candidates the validator refused.
#[derive(Debug, Serialize, Deserialize)]
pub struct RejectionResponse {
    /// Human-readable reason.
    pub error: String,
    /// Stable machine-readable rule label.
    pub reason: String,
    /// Whether resubmitting the same payload is expected to succeed.
    pub retry: bool,
}

/// Generic error body for internal faults.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything a write can fail with, mapped to a status code at the edge.
#[derive(Debug)]
pub enum ApiError {
    /// Body did not parse as `{"payload": <int>}`. The chain was not touched.
    Decode { message: String, body: String },
    /// The validator refused the candidate. The chain was not touched.
    Rejected(RejectReason),
    /// A store invariant is broken. Not caused by the request.
    Internal(ChainError),
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Rejected(reason) => ApiError::Rejected(reason),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Decode { message, body } => (
                StatusCode::BAD_REQUEST,
                Json(DecodeErrorResponse {
                    error: message,
                    body,
                }),
            )
                .into_response(),
            ApiError::Rejected(reason) => {
                let error = if reason.is_stale_tip() {
                    format!("{reason}; tip changed, resubmit")
                } else {
                    reason.to_string()
                };
                (
                    StatusCode::CONFLICT,
                    Json(RejectionResponse {
                        error,
                        reason: reason.label().to_string(),
                        retry: reason.is_stale_tip(),
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("internal fault: {err}"),
                }),
            )
                .into_response(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 if the node is alive.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "chain_length": state.chain.len(),
    }))
}

/// `GET /`: the whole chain, in order, from one consistent snapshot.
async fn chain_handler(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.chain.snapshot())
}

/// `POST /`: derive a block from the current tip and commit it.
///
/// The body is taken as raw bytes so that decode failures map to 400 with
/// the offending body echoed back, rather than axum's default rejection.
async fn write_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let request: WriteRequest = serde_json::from_slice(&body).map_err(|e| {
        state.metrics.malformed_requests_total.inc();
        tracing::debug!(error = %e, "malformed write request");
        ApiError::Decode {
            message: format!("malformed request body: {e}"),
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    })?;

    let started = Instant::now();
    let result = commit_payload(&state.chain, request.payload);
    state
        .metrics
        .append_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok(block) => {
            state.metrics.record_commit(&block);
            Ok((StatusCode::CREATED, Json(block)))
        }
        Err(err) => {
            let err = ApiError::from(err);
            match &err {
                ApiError::Rejected(reason) => state
                    .metrics
                    .blocks_rejected_total
                    .with_label_values(&[reason.label()])
                    .inc(),
                ApiError::Internal(fault) => {
                    tracing::error!(error = %fault, "chain store invariant violated")
                }
                ApiError::Decode { .. } => {}
            }
            Err(err)
        }
    }
}

/// Build a candidate from a tip snapshot and hand it to the store.
fn commit_payload(chain: &ChainStore, payload: i64) -> Result<Block, ChainError> {
    let parent = chain.tip()?;
    let candidate = Block::next(&parent, payload);
    chain.append(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
