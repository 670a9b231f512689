//! Approval Bot Core - Shared types library.
//!
//! This crate provides the types that describe an approval request as it
//! travels through Slack:
//! - `approval-bot` - The HTTP service that relays requests and decisions
//! - `integration-tests` - End-to-end tests against a fake Slack API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Request
//! state is never stored by the bot; these types are built from inbound
//! payloads, consumed once, and dropped.
//!
//! # Modules
//!
//! - [`types`] - Slack id newtypes, decisions, and request status transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
