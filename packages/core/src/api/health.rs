//! Liveness, readiness, and health endpoints.
//!
//! `/live` answers without touching the store. `/ready` and `/health` both
//! probe the database with a trivial query but report failure differently:
//! `/ready` returns 503 while `/health` stays 200 and flags the database in
//! the body. The asymmetry is intentional and preserved as-is.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::ApiState;

/// `GET /live` — process liveness; succeeds whenever the process runs.
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

/// `GET /ready` — 503 when the store cannot answer a trivial query.
pub async fn readiness(
    State(repo): State<ApiState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match repo.ping().await {
        Ok(()) => Ok(Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!("Database unreachable: {}", err);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "database unavailable" })),
            ))
        }
    }
}

/// `GET /health` — degraded-but-200: database state is reported in the body
/// rather than the status code.
pub async fn health(State(repo): State<ApiState>) -> Json<Value> {
    let database = match repo.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            tracing::error!("Database health check failed: {}", err);
            "unhealthy"
        }
    };

    Json(json!({ "service": "healthy", "database": database }))
}
