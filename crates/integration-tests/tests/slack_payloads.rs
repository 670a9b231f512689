//! Integration tests for parsing inbound Slack payloads through the public API.

use approval_bot::slack::{CommandPayload, InteractionChannel, InteractionPayload, SlashCommand};
use approval_bot_integration_tests::{button_press, command_form, form};

#[test]
fn test_block_actions_channel_is_nameable() {
    let payload = button_press("U2", "approve_action", "U1", "D123", "1.1");
    let body = form(&[("payload", &payload.to_string())]);

    let InteractionPayload::BlockActions(actions) =
        InteractionPayload::from_form(&body).expect("parse")
    else {
        panic!("expected block_actions");
    };

    let channel: &InteractionChannel = actions.channel.as_ref().expect("channel");
    assert_eq!(channel.id.as_str(), "D123");
}

#[test]
fn test_extra_slack_fields_are_ignored() {
    // Slack sends team_id, text, response_url and more; only what the flow
    // reads is kept.
    let CommandPayload::Command(SlashCommand {
        command,
        user_id,
        channel_id,
        trigger_id,
    }) = CommandPayload::from_form(&command_form("/approval-boto", "U1")).expect("parse")
    else {
        panic!("expected a command");
    };

    assert_eq!(command, "/approval-boto");
    assert_eq!(user_id.as_str(), "U1");
    assert_eq!(channel_id.as_str(), "C0001");
    assert_eq!(trigger_id.as_str(), "13345224609.738474920.8088930838d88f008e0");
}
