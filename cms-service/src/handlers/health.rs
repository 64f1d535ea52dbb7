use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339, UTC, microsecond precision.
    pub timestamp: String,
    pub firebase_configured: bool,
}

/// Always 200: a missing Firebase handle is reported, not treated as failure.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        firebase_configured: state.firebase.is_some(),
    })
}
