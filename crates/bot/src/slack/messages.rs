//! Slack message builders for the approval flow.
//!
//! Provides factory functions for building Block Kit content for:
//! - The request modal opened by the slash command
//! - The request message sent to the approver
//! - The decision notification and the terminal status line

use approval_bot_core::{Decision, RequestStatus, UserId};

use super::types::{ActionElement, Block, ButtonStyle, InputElement, PlainText, Text, View};

/// `callback_id` of the request modal.
pub const APPROVAL_MODAL_CALLBACK_ID: &str = "approval_modal";
/// Block holding the approver picker.
pub const APPROVER_BLOCK_ID: &str = "approver_block";
/// Action id of the approver picker.
pub const APPROVER_ACTION_ID: &str = "approver_select";
/// Block holding the description field.
pub const DESCRIPTION_BLOCK_ID: &str = "description_block";
/// Action id of the description field.
pub const DESCRIPTION_ACTION_ID: &str = "description_input";
/// Action id of the approve button.
pub const APPROVE_ACTION_ID: &str = "approve_action";
/// Action id of the reject button.
pub const REJECT_ACTION_ID: &str = "reject_action";

/// Map a button's action id back to the decision it stands for.
#[must_use]
pub fn decision_for_action(action_id: &str) -> Option<Decision> {
    match action_id {
        APPROVE_ACTION_ID => Some(Decision::Approve),
        REJECT_ACTION_ID => Some(Decision::Reject),
        _ => None,
    }
}

/// Build the modal that collects an approver and a description.
#[must_use]
pub fn build_request_modal() -> View {
    View::modal(
        APPROVAL_MODAL_CALLBACK_ID,
        "Request Approval",
        "Submit",
        vec![
            Block::Input {
                block_id: APPROVER_BLOCK_ID.to_string(),
                label: PlainText::new("Approver"),
                element: InputElement::UsersSelect {
                    action_id: APPROVER_ACTION_ID.to_string(),
                    placeholder: Some(PlainText::new("Select approver")),
                },
            },
            Block::Input {
                block_id: DESCRIPTION_BLOCK_ID.to_string(),
                label: PlainText::new("Description"),
                element: InputElement::PlainTextInput {
                    action_id: DESCRIPTION_ACTION_ID.to_string(),
                    multiline: true,
                },
            },
        ],
    )
}

/// Build the request message sent to the approver.
///
/// Both buttons carry the requester's id as their value. Slack echoes it
/// back on activation, and that echo is the only way the decision handler
/// learns whom to notify.
#[must_use]
pub fn build_request_message(requester: &UserId, description: &str) -> Vec<Block> {
    vec![
        Block::Section {
            text: Text::mrkdwn(format!(
                "*New Approval Request*\n\n{} requests approval for:\n\n{description}",
                requester.mention()
            )),
        },
        Block::Actions {
            elements: vec![
                ActionElement::Button {
                    text: PlainText::new("✅ Approve"),
                    action_id: APPROVE_ACTION_ID.to_string(),
                    value: Some(requester.as_str().to_string()),
                    style: Some(ButtonStyle::Primary),
                },
                ActionElement::Button {
                    text: PlainText::new("❌ Reject"),
                    action_id: REJECT_ACTION_ID.to_string(),
                    value: Some(requester.as_str().to_string()),
                    style: Some(ButtonStyle::Danger),
                },
            ],
        },
    ]
}

/// Notification fallback for the request message.
#[must_use]
pub fn request_fallback_text(requester: &UserId) -> String {
    format!("New approval request from {}", requester.mention())
}

/// Direct message telling the requester how their request was decided.
#[must_use]
pub fn decision_notification(decision: Decision, actor: &UserId) -> String {
    match decision {
        Decision::Approve => format!(
            "🎉 Your request was {} by {}!",
            decision.past_tense(),
            actor.mention()
        ),
        Decision::Reject => format!(
            "❌ Your request was {} by {}",
            decision.past_tense(),
            actor.mention()
        ),
    }
}

/// Terminal status line that replaces a decided request message.
#[must_use]
pub fn decided_status_line(status: RequestStatus, actor: &UserId) -> String {
    format!("{} by {}", status.label(), actor.mention())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_modal_structure() {
        let view = serde_json::to_value(build_request_modal()).expect("serialize");

        assert_eq!(view["type"], "modal");
        assert_eq!(view["callback_id"], APPROVAL_MODAL_CALLBACK_ID);
        assert_eq!(view["title"]["text"], "Request Approval");
        assert_eq!(view["submit"]["text"], "Submit");

        let blocks = view["blocks"].as_array().expect("blocks");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["block_id"], APPROVER_BLOCK_ID);
        assert_eq!(blocks[0]["element"]["type"], "users_select");
        assert_eq!(blocks[0]["element"]["action_id"], APPROVER_ACTION_ID);
        assert_eq!(blocks[1]["block_id"], DESCRIPTION_BLOCK_ID);
        assert_eq!(blocks[1]["element"]["type"], "plain_text_input");
        assert_eq!(blocks[1]["element"]["multiline"], true);
    }

    #[test]
    fn test_request_message_buttons_carry_requester() {
        let requester = UserId::new("U1");
        let blocks = build_request_message(&requester, "Deploy v2");

        assert_eq!(blocks.len(), 2);
        let Some(Block::Actions { elements }) = blocks.get(1) else {
            panic!("Expected Actions block");
        };
        assert_eq!(elements.len(), 2);

        let value = serde_json::to_value(elements).expect("serialize");
        assert_eq!(value[0]["action_id"], APPROVE_ACTION_ID);
        assert_eq!(value[0]["style"], "primary");
        assert_eq!(value[0]["value"], "U1");
        assert_eq!(value[1]["action_id"], REJECT_ACTION_ID);
        assert_eq!(value[1]["style"], "danger");
        assert_eq!(value[1]["value"], "U1");
    }

    #[test]
    fn test_request_message_text() {
        let blocks = build_request_message(&UserId::new("U1"), "Deploy v2");
        let Some(Block::Section {
            text: Text::Mrkdwn { text },
        }) = blocks.first()
        else {
            panic!("Expected Section block");
        };
        assert_eq!(
            text,
            "*New Approval Request*\n\n<@U1> requests approval for:\n\nDeploy v2"
        );
    }

    #[test]
    fn test_request_message_empty_description() {
        let value =
            serde_json::to_value(build_request_message(&UserId::new("U1"), "")).expect("json");
        assert_eq!(
            value[0]["text"],
            json!({"type": "mrkdwn", "text": "*New Approval Request*\n\n<@U1> requests approval for:\n\n"})
        );
    }

    #[test]
    fn test_decision_for_action() {
        assert_eq!(decision_for_action("approve_action"), Some(Decision::Approve));
        assert_eq!(decision_for_action("reject_action"), Some(Decision::Reject));
        assert_eq!(decision_for_action("approver_select"), None);
    }

    #[test]
    fn test_decision_notifications() {
        let actor = UserId::new("U2");
        assert_eq!(
            decision_notification(Decision::Approve, &actor),
            "🎉 Your request was approved by <@U2>!"
        );
        assert_eq!(
            decision_notification(Decision::Reject, &actor),
            "❌ Your request was rejected by <@U2>"
        );
    }

    #[test]
    fn test_decided_status_line() {
        let actor = UserId::new("U2");
        assert_eq!(
            decided_status_line(RequestStatus::Approved, &actor),
            "Approved by <@U2>"
        );
        assert_eq!(
            decided_status_line(RequestStatus::Rejected, &actor),
            "Rejected by <@U2>"
        );
    }
}
