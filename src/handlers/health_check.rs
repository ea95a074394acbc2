//! # Health Check Handler
//!
//! Liveness endpoint for load balancers and deployment tooling. It touches
//! neither the record store nor the payment processor.

use axum::http::StatusCode;
use tracing::{debug, instrument};

/// Health check endpoint that returns 200 OK.
///
/// GET /health-check
#[instrument]
pub async fn health_check() -> StatusCode {
    debug!("Health check endpoint accessed");
    StatusCode::OK
}
