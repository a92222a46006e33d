/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 0, "idle_connections": 1, "total_connections": 1 }
/// }
/// ```
///
/// Always answers 200; a dead database shows up as `"degraded"`.

use crate::app::AppState;
use axum::{extract::State, Json};
use docportal_shared::db::pool::{get_pool_stats, health_check as database_health, PoolStats};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub pool: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match database_health(&state.db).await {
        Ok(()) => ("healthy", "connected"),
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            ("degraded", "disconnected")
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        pool: get_pool_stats(&state.db),
    })
}
