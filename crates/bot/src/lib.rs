//! Approval Bot library.
//!
//! Relays an approval request from one Slack user to an approver and
//! records the approver's decision. This crate provides the bot as a
//! library, allowing it to be driven end to end in tests.
//!
//! # Flow
//!
//! ```text
//! /approval-boto ──► modal ──► DM to approver [Approve] [Reject]
//!                                   │
//!                                   ▼
//!                 DM to requester + message rewritten, buttons removed
//! ```
//!
//! No request state is kept in the process. The requester travels inside the
//! buttons' values and comes back with the click.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod slack;
pub mod state;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
