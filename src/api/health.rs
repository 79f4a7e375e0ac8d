//! Health check endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
}

/// GET /api/health - Liveness probe, no auth required.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        success: true,
        message: "Blog API is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
