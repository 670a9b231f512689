//! Slack integration for the approval flow.
//!
//! This module provides:
//! - [`SlackClient`] for opening modals, sending and updating messages
//! - Block Kit types for building modals and interactive messages
//! - Typed inbound payloads (slash commands, interactions, events)
//! - Message builders for each step of the flow
//! - Webhook signature verification
//!
//! # Flow
//!
//! 1. A user runs the slash command; the bot opens the request modal
//! 2. The user picks an approver and submits; the bot DMs the approver
//!    a message with Approve and Reject buttons
//! 3. The approver clicks a button; the bot DMs the requester the outcome
//! 4. The request message is updated with the outcome and its buttons removed

mod client;
mod error;
mod messages;
mod payload;
mod types;

pub use client::{SLACK_API_BASE, SlackClient};
pub use error::SlackError;
pub use messages::{
    APPROVAL_MODAL_CALLBACK_ID, APPROVE_ACTION_ID, APPROVER_ACTION_ID, APPROVER_BLOCK_ID,
    DESCRIPTION_ACTION_ID, DESCRIPTION_BLOCK_ID, REJECT_ACTION_ID, build_request_message,
    build_request_modal, decided_status_line, decision_for_action, decision_notification,
    request_fallback_text,
};
pub use payload::{
    BlockActions, CommandPayload, EventEnvelope, InteractionAction, InteractionChannel,
    InteractionContainer, InteractionPayload, InteractionUser, SlashCommand, StateValue,
    SubmittedView, ViewState, ViewSubmission,
};
pub use types::{
    ActionElement, ApiStatus, Block, ButtonStyle, InputElement, OpenViewResponse, PlainText,
    PostMessageResponse, Text, UpdateMessageResponse, View,
};
