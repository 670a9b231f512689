//! Slack webhook handlers.
//!
//! Every request is signature-checked against the raw body before anything
//! is parsed. Accepted requests are acknowledged with an empty 200 right
//! away; the Slack calls that follow run on a spawned task so they never
//! hold up the acknowledgment (Slack gives up after three seconds). That
//! task waits until the acknowledgment has been written before it calls
//! Slack.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use futures::Stream;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::{AppError, report_unhandled};
use crate::services::{ApprovalService, decision_from_actions};
use crate::slack::{APPROVAL_MODAL_CALLBACK_ID, CommandPayload, EventEnvelope, InteractionPayload};
use crate::state::AppState;

/// Header carrying the request timestamp Slack signed.
const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
/// Header carrying the `v0=` signature.
const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Create Slack webhook routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/slack/commands", post(handle_command))
        .route("/slack/events", post(handle_event))
}

/// Handle a slash command.
///
/// Acknowledges, then opens the request modal.
#[instrument(skip(state, headers, body))]
async fn handle_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    verify_request(&state, &headers, &body)?;

    let command = match CommandPayload::from_form(&body)? {
        CommandPayload::SslCheck => {
            debug!("Answered Slack ssl_check");
            return Ok(StatusCode::OK.into_response());
        }
        CommandPayload::Command(command) => command,
    };

    let expected = &state.config().slack.command;
    if command.command != *expected {
        warn!(command = %command.command, expected = %expected, "Ignoring unknown slash command");
        return Ok(StatusCode::OK.into_response());
    }

    info!(user = %command.user_id, channel = %command.channel_id, "Slash command received");

    let service = ApprovalService::new(state.slack().clone());
    Ok(spawn_after_ack("slash_command", async move {
        service.open_request_form(&command).await;
        Ok(())
    }))
}

/// Handle interactivity payloads and Events API callbacks.
///
/// Interactions arrive form-encoded; Events API callbacks arrive as JSON.
#[instrument(skip(state, headers, body))]
async fn handle_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    verify_request(&state, &headers, &body)?;

    if is_json(&headers) {
        return handle_event_callback(&body);
    }

    let service = ApprovalService::new(state.slack().clone());

    match InteractionPayload::from_form(&body)? {
        InteractionPayload::ViewSubmission(submission) => {
            if submission.view.callback_id != APPROVAL_MODAL_CALLBACK_ID {
                debug!(callback_id = %submission.view.callback_id, "Ignoring unrelated view submission");
                return Ok(StatusCode::OK.into_response());
            }

            info!(user = %submission.user.id, "Approval modal submitted");
            // An empty 200 also closes the modal.
            Ok(spawn_after_ack("view_submission", async move {
                service.submit_request(&submission).await.map(|_| ())
            }))
        }
        InteractionPayload::BlockActions(actions) => {
            info!(user = %actions.user.id, "Block action received");
            Ok(spawn_after_ack("block_actions", async move {
                let Some(event) = decision_from_actions(&actions)? else {
                    return Ok(());
                };
                service.record_decision(&event).await.map(|_| ())
            }))
        }
        InteractionPayload::Unsupported => {
            debug!("Ignoring unsupported interaction type");
            Ok(StatusCode::OK.into_response())
        }
    }
}

/// Answer an Events API callback.
fn handle_event_callback(body: &str) -> Result<Response, AppError> {
    let envelope: EventEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse event: {e}")))?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("Answered Events API url_verification");
            Ok(Json(json!({ "challenge": challenge })).into_response())
        }
        EventEnvelope::EventCallback { event_id, event } => {
            debug!(
                event_id = ?event_id,
                event_type = ?event.get("type").and_then(|t| t.as_str()),
                "Ignoring event callback"
            );
            Ok(StatusCode::OK.into_response())
        }
        EventEnvelope::Unsupported => Ok(StatusCode::OK.into_response()),
    }
}

/// Check the Slack signature headers against the raw body.
fn verify_request(state: &AppState, headers: &HeaderMap, body: &str) -> Result<(), AppError> {
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing timestamp header".into()))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".into()))?;

    state
        .slack()
        .verify_signature(timestamp, body, signature)
        .map_err(|e| AppError::Unauthorized(e.to_string()))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Empty body of an acknowledgment.
///
/// The server drops the body once the response has been written; dropping
/// `_acked` wakes whoever holds the matching receiver.
struct AckBody {
    _acked: oneshot::Sender<()>,
}

impl Stream for AckBody {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(None)
    }
}

/// Build an empty 200 and a receiver that resolves once it has gone out.
fn ack_response() -> (Response, oneshot::Receiver<()>) {
    let (acked, on_acked) = oneshot::channel();
    let body = Body::from_stream(AckBody { _acked: acked });
    ((StatusCode::OK, body).into_response(), on_acked)
}

/// Acknowledge the request and run `work` once the acknowledgment is out.
///
/// Errors that escape `work` go to the global error observer.
fn spawn_after_ack<F>(handler: &'static str, work: F) -> Response
where
    F: Future<Output = Result<(), AppError>> + Send + 'static,
{
    let (response, on_acked) = ack_response();

    tokio::spawn(
        async move {
            // Never sent on; resolves when the body is dropped.
            let _ = on_acked.await;

            if let Err(e) = work.await {
                report_unhandled(handler, &e);
            }
        }
        .in_current_span(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tokio::sync::oneshot::error::TryRecvError;

    #[tokio::test]
    async fn test_ack_signals_only_after_body_is_consumed() {
        let (response, mut on_acked) = ack_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(matches!(on_acked.try_recv(), Err(TryRecvError::Empty)));

        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        assert!(body.is_empty());
        assert!(matches!(on_acked.try_recv(), Err(TryRecvError::Closed)));
    }

    #[tokio::test]
    async fn test_work_waits_for_ack() {
        let (ran_tx, mut ran_rx) = oneshot::channel();
        let response = spawn_after_ack("test", async move {
            let _ = ran_tx.send(());
            Ok(())
        });

        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(matches!(ran_rx.try_recv(), Err(TryRecvError::Empty)));

        drop(response);
        tokio::time::timeout(std::time::Duration::from_secs(1), ran_rx)
            .await
            .expect("work ran after ack")
            .expect("work signalled");
    }
}
