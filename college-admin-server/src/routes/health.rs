//! Health check endpoint

use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// RFC 3339, UTC
    pub timestamp: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "College Admin Panel Server is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
