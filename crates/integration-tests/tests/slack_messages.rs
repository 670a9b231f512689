//! Integration tests for approval flow message building.
//!
//! These tests check the Block Kit JSON the bot sends, as Slack will see it.

use serde_json::{Value, json};

use approval_bot::slack::{
    APPROVAL_MODAL_CALLBACK_ID, Block, build_request_message, build_request_modal,
    decided_status_line, decision_notification, request_fallback_text,
};
use approval_bot_core::{Decision, RequestStatus, UserId};

fn to_json(blocks: &[Block]) -> Value {
    serde_json::to_value(blocks).expect("serialize blocks")
}

// =============================================================================
// Request Modal Tests
// =============================================================================

#[test]
fn test_request_modal_has_two_inputs() {
    let view = serde_json::to_value(build_request_modal()).expect("serialize view");

    assert_eq!(view["type"], "modal");
    assert_eq!(view["callback_id"], APPROVAL_MODAL_CALLBACK_ID);

    let blocks = view["blocks"].as_array().expect("blocks array");
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b["type"] == "input"));

    assert_eq!(blocks[0]["label"]["text"], "Approver");
    assert_eq!(blocks[0]["element"]["placeholder"]["text"], "Select approver");
    assert_eq!(blocks[1]["label"]["text"], "Description");
    assert_eq!(blocks[1]["element"]["multiline"], true);
}

// =============================================================================
// Request Message Tests
// =============================================================================

#[test]
fn test_request_message_structure() {
    let blocks = build_request_message(&UserId::new("U1"), "Buy a new laptop");
    assert_eq!(blocks.len(), 2);
    assert!(matches!(blocks[0], Block::Section { .. }));
    assert!(matches!(blocks[1], Block::Actions { .. }));

    let json = to_json(&blocks);
    assert_eq!(
        json[0]["text"],
        json!({
            "type": "mrkdwn",
            "text": "*New Approval Request*\n\n<@U1> requests approval for:\n\nBuy a new laptop"
        })
    );
}

#[test]
fn test_request_message_buttons_carry_requester() {
    let json = to_json(&build_request_message(&UserId::new("U1"), "x"));
    let buttons = json[1]["elements"].as_array().expect("buttons");

    assert_eq!(buttons[0]["text"]["text"], "✅ Approve");
    assert_eq!(buttons[0]["style"], "primary");
    assert_eq!(buttons[1]["text"]["text"], "❌ Reject");
    assert_eq!(buttons[1]["style"], "danger");
    assert!(buttons.iter().all(|b| b["value"] == "U1"));
}

#[test]
fn test_request_message_keeps_description_verbatim() {
    let description = "Line one\n*not bold* <https://example.com|link>";
    let json = to_json(&build_request_message(&UserId::new("U1"), description));

    let text = json[0]["text"]["text"].as_str().expect("section text");
    assert!(text.ends_with(description));
}

#[test]
fn test_request_fallback_text() {
    assert_eq!(
        request_fallback_text(&UserId::new("U1")),
        "New approval request from <@U1>"
    );
}

// =============================================================================
// Decision Tests
// =============================================================================

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
fn test_decided_status_lines() {
    let actor = UserId::new("U2");
    let approved = RequestStatus::Pending.decide(Decision::Approve).expect("pending");
    let rejected = RequestStatus::Pending.decide(Decision::Reject).expect("pending");

    assert_eq!(decided_status_line(approved, &actor), "Approved by <@U2>");
    assert_eq!(decided_status_line(rejected, &actor), "Rejected by <@U2>");
}
