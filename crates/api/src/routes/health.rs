use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every configured dependency answers, else `degraded`.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable; `null` on the in-memory store.
    pub db_healthy: Option<bool>,
    /// Whether the scoring oracle is reachable; `null` when not configured.
    pub scoring_healthy: Option<bool>,
    /// Open WebSocket connections.
    pub ws_connections: usize,
}

/// GET /health -- returns service, database, and oracle health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match &state.pool {
        Some(pool) => Some(terrainsight_db::health_check(pool).await.is_ok()),
        None => None,
    };
    let scoring_healthy = match &state.scoring {
        Some(client) => Some(client.health().await.is_ok()),
        None => None,
    };

    let degraded = db_healthy == Some(false) || scoring_healthy == Some(false);
    let status = if degraded { "degraded" } else { "ok" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        scoring_healthy,
        ws_connections: state.ws_manager.connection_count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
