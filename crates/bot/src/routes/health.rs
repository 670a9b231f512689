//! Liveness endpoints.
//!
//! Neither endpoint touches Slack, so they answer even when the Slack API is
//! unreachable or the credentials are wrong.

use axum::{Router, routing::get};

use crate::state::AppState;

/// Body returned by `GET /`.
pub const ROOT_MESSAGE: &str = "Approval Bot is running!";

/// Create health routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Root liveness check.
async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
