//! Inbound payloads: slash commands, interactions, and Events API callbacks.
//!
//! Slack posts slash commands and interactions as
//! `application/x-www-form-urlencoded`; interactions carry their JSON in a
//! single `payload` field. Events API callbacks are plain JSON.

use std::collections::HashMap;

use approval_bot_core::{ChannelId, MessageTs, TriggerId, UserId};
use serde::Deserialize;

use super::error::SlackError;

// =============================================================================
// Slash Commands
// =============================================================================

/// Body posted to the slash command endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPayload {
    /// Slack's periodic certificate check (`ssl_check=1`), carries no command.
    SslCheck,
    /// A user ran a slash command.
    Command(SlashCommand),
}

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    /// Command name including the slash (e.g. `/approval-boto`).
    pub command: String,
    /// User who ran the command.
    pub user_id: UserId,
    /// Channel the command was run in.
    pub channel_id: ChannelId,
    /// Short-lived handle for opening a modal.
    pub trigger_id: TriggerId,
}

impl CommandPayload {
    /// Parse a form-encoded slash command body.
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidPayload`] if a required field is missing.
    pub fn from_form(body: &str) -> Result<Self, SlackError> {
        let mut fields: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        if fields.get("ssl_check").is_some_and(|v| v == "1") {
            return Ok(Self::SslCheck);
        }

        let mut required = |key: &str| {
            fields
                .remove(key)
                .ok_or_else(|| SlackError::InvalidPayload(format!("missing command field `{key}`")))
        };

        let command = required("command")?;
        let user_id = UserId::from(required("user_id")?);
        let channel_id = ChannelId::from(required("channel_id")?);
        let trigger_id = TriggerId::from(required("trigger_id")?);

        Ok(Self::Command(SlashCommand {
            command,
            user_id,
            channel_id,
            trigger_id,
        }))
    }
}

// =============================================================================
// Interactions
// =============================================================================

/// Interaction payload, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    /// A button (or other block element) was activated.
    BlockActions(BlockActions),
    /// A modal was submitted.
    ViewSubmission(ViewSubmission),
    /// Any interaction type the bot does not handle.
    #[serde(other)]
    Unsupported,
}

impl InteractionPayload {
    /// Parse a form-encoded interaction body (`payload=<json>`).
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidPayload`] if the `payload` field is
    /// missing or is not valid JSON for a known interaction shape.
    pub fn from_form(body: &str) -> Result<Self, SlackError> {
        let payload = form_urlencoded::parse(body.as_bytes())
            .find_map(|(key, value)| (key == "payload").then_some(value))
            .ok_or_else(|| SlackError::InvalidPayload("missing `payload` field".to_string()))?;

        serde_json::from_str(&payload)
            .map_err(|e| SlackError::InvalidPayload(format!("interaction JSON: {e}")))
    }
}

/// `block_actions` interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockActions {
    /// User who triggered the interaction.
    pub user: InteractionUser,
    /// Where the activated element lives.
    #[serde(default)]
    pub container: Option<InteractionContainer>,
    /// Channel where the interaction occurred.
    #[serde(default)]
    pub channel: Option<InteractionChannel>,
    /// Actions that were triggered.
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
}

/// `view_submission` interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewSubmission {
    /// User who submitted the modal.
    pub user: InteractionUser,
    /// The modal as submitted.
    pub view: SubmittedView,
}

/// User who triggered an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    /// Slack user id.
    pub id: UserId,
}

/// Container for the interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionContainer {
    /// Timestamp of the message holding the element.
    #[serde(default)]
    pub message_ts: Option<MessageTs>,
    /// Channel of that message.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
}

/// Channel where interaction occurred.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionChannel {
    /// Slack channel id.
    pub id: ChannelId,
}

/// Action that was triggered.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionAction {
    /// Action id (set when creating the button).
    pub action_id: String,
    /// Value attached to the element, echoed back verbatim.
    #[serde(default)]
    pub value: Option<String>,
}

/// The submitted modal.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedView {
    /// Identifies which modal was submitted.
    pub callback_id: String,
    /// Values of the modal's inputs.
    pub state: ViewState,
}

/// Input values of a submitted modal, keyed by block id then action id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, StateValue>>,
}

impl ViewState {
    /// Look up the value of one input element.
    #[must_use]
    pub fn get(&self, block_id: &str, action_id: &str) -> Option<&StateValue> {
        self.values.get(block_id)?.get(action_id)
    }
}

/// Value of one input element.
#[derive(Debug, Clone, Deserialize)]
pub struct StateValue {
    /// Set by `users_select`.
    #[serde(default)]
    pub selected_user: Option<UserId>,
    /// Set by `plain_text_input`; absent when left empty.
    #[serde(default)]
    pub value: Option<String>,
}

// =============================================================================
// Events API
// =============================================================================

/// Events API envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Sent once when the request URL is configured; echo the challenge.
    UrlVerification { challenge: String },
    /// A subscribed event. The bot subscribes to none, so these are ignored.
    EventCallback {
        #[serde(default)]
        event_id: Option<String>,
        #[serde(default)]
        event: serde_json::Value,
    },
    #[serde(other)]
    Unsupported,
}
