//! Unified error handling for the bot.
//!
//! Errors raised while answering an inbound request become HTTP responses
//! through [`AppError`]'s `IntoResponse`. Errors raised after a request has
//! been acknowledged have no response to travel on; they end up in
//! [`report_unhandled`], the global error observer.

use approval_bot_core::TransitionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::slack::SlackError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Slack API call or payload handling failed.
    #[error("Slack error: {0}")]
    Slack(#[from] SlackError),

    /// A decision could not be applied to the request status.
    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    /// Request signature missing or invalid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Transition(_)
                | Self::Slack(SlackError::Request(_) | SlackError::Response(_) | SlackError::Api(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }

        let status = match &self {
            Self::Internal(_) | Self::Transition(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Slack(SlackError::InvalidSignature(_)) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Slack(SlackError::InvalidPayload(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Slack(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) | Self::Transition(_) => "Internal server error".to_string(),
            Self::Slack(SlackError::Request(_) | SlackError::Response(_) | SlackError::Api(_)) => {
                "External service error".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Global error observer.
///
/// Receives errors that escaped a handler after its request was
/// acknowledged. Logs and reports them; never retries, never notifies the
/// user, never stops the process.
pub fn report_unhandled(handler: &str, error: &AppError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        handler,
        error = %error,
        sentry_event_id = %event_id,
        "Unhandled error in background handler"
    );
}
