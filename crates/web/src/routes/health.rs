//! Health check route handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness check: the process is up.
pub async fn health() -> &'static str {
    "OK"
}

/// Readiness check: the database answers.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
