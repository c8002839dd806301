//! Health check handlers

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::{db, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub database: bool,
    pub judge_configured: bool,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness: the database answers. A missing judge is reported, not fatal.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database = match db::ping(state.db()).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness check: database unreachable");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            status: if database { "ready" } else { "unavailable" }.to_string(),
            database,
            judge_configured: state.config().judge.url.is_some(),
        }),
    )
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}
