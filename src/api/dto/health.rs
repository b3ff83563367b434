//! DTOs for health check endpoint.

use serde::Serialize;

/// Liveness report returned by `GET /healthz`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_seconds: u64,
}
