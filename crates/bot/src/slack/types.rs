//! Slack Block Kit and Web API types.
//!
//! These types represent the subset of Block Kit needed for the approval
//! modal and the interactive request message, plus the request and response
//! bodies of the three Web API methods the bot calls.
//!
//! See: <https://api.slack.com/block-kit>

use approval_bot_core::{ChannelId, MessageTs, TriggerId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Block Kit
// =============================================================================

/// Block Kit block types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Section block with text.
    Section { text: Text },
    /// Actions block with interactive elements.
    Actions { elements: Vec<ActionElement> },
    /// Input block (modals only).
    Input {
        block_id: String,
        label: PlainText,
        element: InputElement,
    },
}

/// Text object types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Markdown text (supports formatting and mentions).
    Mrkdwn { text: String },
}

impl Text {
    /// Create a markdown text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Plain text object (labels, titles, button captions).
#[derive(Debug, Clone, Serialize)]
pub struct PlainText {
    #[serde(rename = "type")]
    pub text_type: &'static str,
    pub text: String,
    pub emoji: bool,
}

impl PlainText {
    /// Create a new plain text object.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text_type: "plain_text",
            text: text.into(),
            emoji: true,
        }
    }
}

/// Action block elements.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionElement {
    /// Interactive button.
    Button {
        text: PlainText,
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
}

/// Input block elements.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    /// Single workspace user picker.
    UsersSelect {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<PlainText>,
    },
    /// Free text field.
    PlainTextInput { action_id: String, multiline: bool },
}

/// Button style (affects color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    /// Green primary button.
    Primary,
    /// Red danger button.
    Danger,
}

/// A modal view definition for `views.open`.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    #[serde(rename = "type")]
    pub view_type: &'static str,
    /// Identifies the view in the later `view_submission`.
    pub callback_id: String,
    pub title: PlainText,
    pub submit: PlainText,
    pub blocks: Vec<Block>,
}

impl View {
    /// Create a modal view.
    #[must_use]
    pub fn modal(
        callback_id: impl Into<String>,
        title: impl Into<String>,
        submit: impl Into<String>,
        blocks: Vec<Block>,
    ) -> Self {
        Self {
            view_type: "modal",
            callback_id: callback_id.into(),
            title: PlainText::new(title),
            submit: PlainText::new(submit),
            blocks,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `chat.postMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessage {
    /// Channel id, or a user id for a direct message.
    pub channel: ChannelId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    /// Notification text; the message body when `blocks` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Body of `chat.update`.
///
/// `blocks` is always serialized: an empty list is how the interactive
/// buttons get removed from a decided message.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMessage {
    pub channel: ChannelId,
    pub ts: MessageTs,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Body of `views.open`.
#[derive(Debug, Clone, Serialize)]
pub struct OpenView {
    pub trigger_id: TriggerId,
    pub view: View,
}

// =============================================================================
// Response Types
// =============================================================================

/// Fields shared by every Web API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    /// Whether the request was successful.
    pub ok: bool,
    /// Error code if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

/// Access to the common status of a Web API response.
pub trait ApiResponse {
    fn status(&self) -> &ApiStatus;
}

/// Response from posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    /// Channel id where the message was posted.
    #[serde(default)]
    pub channel: Option<ChannelId>,
    /// Message timestamp (unique id).
    #[serde(default)]
    pub ts: Option<MessageTs>,
}

/// Response from updating a message.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessageResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub channel: Option<ChannelId>,
    #[serde(default)]
    pub ts: Option<MessageTs>,
}

/// Response from opening a view.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenViewResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub view: Option<OpenedView>,
}

/// The view Slack rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenedView {
    pub id: String,
}

impl ApiResponse for PostMessageResponse {
    fn status(&self) -> &ApiStatus {
        &self.status
    }
}

impl ApiResponse for UpdateMessageResponse {
    fn status(&self) -> &ApiStatus {
        &self.status
    }
}

impl ApiResponse for OpenViewResponse {
    fn status(&self) -> &ApiStatus {
        &self.status
    }
}
