//! Liveness and readiness probes.

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::error::Result;
use crate::response::json_ok;
use crate::state::AppState;

/// Liveness: the process is up.
pub async fn health() -> Response {
    json_ok(json!({ "status": "ok" }))
}

/// Readiness: the database answers.
///
/// # Errors
///
/// Returns a 500 if the database is unreachable.
pub async fn ready(State(state): State<AppState>) -> Result<Response> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(crate::db::RepositoryError::Database)?;
    Ok(json_ok(json!({ "status": "ready" })))
}
