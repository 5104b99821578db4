//! Health check endpoint
//!
//! `/health` and `/healthz` report liveness plus a per-kind record count.
//! The probe returns 200 whenever the process is serving; a failed count
//! only drops the `counts` field.

use hyper::StatusCode;
use serde::Serialize;
use tracing::warn;

use super::{json_response, ApiResponse};
use crate::db::StoreCounts;
use crate::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Seconds since the state was created
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<StoreCounts>,
}

async fn build_health_response(state: &AppState) -> HealthResponse {
    let counts = match state.storage.counts().await {
        Ok(counts) => Some(counts),
        Err(e) => {
            warn!(error = %e, "Health check could not read store counts");
            None
        }
    };

    HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        counts,
    }
}

/// Handle liveness probe (/health, /healthz)
pub async fn health_check(state: &AppState) -> ApiResponse {
    let response = build_health_response(state).await;
    json_response(StatusCode::OK, &response)
}
