//! Integration tests for inbound request handling.
//!
//! Covers the health endpoints, signature checks, the acknowledgment
//! deadline, and Slack's housekeeping requests.

use std::io::Read;
use std::net::TcpStream;
use std::time::{Duration, Instant};

use approval_bot_integration_tests::{
    COMMAND, TestContext, button_press, command_form, form, sign, unix_now,
};
use serde_json::{Value, json};

const FORM: &str = "application/x-www-form-urlencoded";

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_root_reports_running() {
    let ctx = TestContext::spawn().await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Approval Bot is running!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::spawn().await;

    let response = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
    assert!(ctx.slack.calls().await.is_empty());
}

// =============================================================================
// Signature Verification
// =============================================================================

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let ctx = TestContext::spawn().await;

    let body = form(&[("command", COMMAND), ("user_id", "U1")]);
    let timestamp = unix_now().to_string();
    let response = ctx
        .post_with_signature(
            "/slack/commands",
            FORM,
            body,
            &timestamp,
            "v0=0000000000000000000000000000000000000000000000000000000000000000",
        )
        .await;
    assert_eq!(response.status(), 401);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ctx.slack.calls().await.is_empty());
}

#[tokio::test]
async fn test_stale_timestamp_is_rejected() {
    let ctx = TestContext::spawn().await;

    let payload = approval_bot_integration_tests::view_submission(
        "approval_modal",
        "U1",
        Some("U2"),
        Some("Deploy"),
    );
    let body = form(&[("payload", &payload.to_string())]);
    let timestamp = (unix_now() - 10 * 60).to_string();
    let signature = sign(&timestamp, &body);

    let response = ctx
        .post_with_signature("/slack/events", FORM, body, &timestamp, &signature)
        .await;
    assert_eq!(response.status(), 401);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ctx.slack.calls().await.is_empty());
}

#[tokio::test]
async fn test_tampered_body_is_rejected() {
    let ctx = TestContext::spawn().await;

    let timestamp = unix_now().to_string();
    let signature = sign(&timestamp, "command=%2Fapproval-boto&user_id=U1");
    let response = ctx
        .post_with_signature(
            "/slack/commands",
            FORM,
            "command=%2Fapproval-boto&user_id=U9".to_string(),
            &timestamp,
            &signature,
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_missing_signature_headers() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/slack/events"))
        .header("content-type", FORM)
        .body("payload=%7B%7D")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// =============================================================================
// Acknowledgment
// =============================================================================

#[tokio::test]
async fn test_command_is_acknowledged_before_modal_opens() {
    let ctx = TestContext::spawn().await;
    ctx.slack.delay(Duration::from_secs(2)).await;

    let started = Instant::now();
    let response = ctx.run_command(COMMAND, "U1").await;
    let elapsed = started.elapsed();

    assert_eq!(response.status(), 200);
    assert!(
        elapsed < Duration::from_secs(1),
        "acknowledgment took {elapsed:?}"
    );

    ctx.slack.wait_for("views.open", 1).await;
}

#[tokio::test]
async fn test_button_press_is_acknowledged_before_side_effects() {
    let ctx = TestContext::spawn().await;
    ctx.slack.delay(Duration::from_secs(2)).await;

    let started = Instant::now();
    let response = ctx
        .press("U2", "approve_action", "U1", "D123", "1.1")
        .await;

    assert_eq!(response.status(), 200);
    assert!(started.elapsed() < Duration::from_secs(1));

    // Side effects still run after the delay
    ctx.slack.wait_for("chat.update", 1).await;
}

/// Read what the bot has already written to a watched socket.
fn read_ack(stream: &mut TcpStream) -> String {
    let mut buf = [0u8; 1024];
    let n = stream.read(&mut buf).expect("ack already received");
    String::from_utf8_lossy(&buf[..n]).into_owned()
}

#[tokio::test]
async fn test_ack_reaches_client_before_modal_opens() {
    let ctx = TestContext::spawn().await;

    for round in 1..=10 {
        let mut stream = ctx
            .post_watched("/slack/commands", FORM, &command_form(COMMAND, "U1"))
            .await;

        let calls = ctx.slack.wait_for("views.open", round).await;
        assert_eq!(
            calls[round - 1].ack_already_received,
            Some(true),
            "views.open arrived before the ack in round {round}"
        );
        assert!(read_ack(&mut stream).starts_with("HTTP/1.1 200"));
    }
}

#[tokio::test]
async fn test_ack_reaches_client_before_decision_side_effects() {
    let ctx = TestContext::spawn().await;

    let payload = button_press("U2", "approve_action", "U1", "D123", "1.1");
    let body = form(&[("payload", &payload.to_string())]);
    let mut stream = ctx.post_watched("/slack/events", FORM, &body).await;

    ctx.slack.wait_for("chat.update", 1).await;
    let calls = ctx.slack.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.ack_already_received == Some(true)));
    assert!(read_ack(&mut stream).starts_with("HTTP/1.1 200"));
}

// =============================================================================
// Slack Housekeeping
// =============================================================================

#[tokio::test]
async fn test_ssl_check() {
    let ctx = TestContext::spawn().await;

    let body = form(&[("ssl_check", "1"), ("token", "legacy")]);
    let response = ctx.post_signed("/slack/commands", FORM, body).await;
    assert_eq!(response.status(), 200);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ctx.slack.calls().await.is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let ctx = TestContext::spawn().await;

    let response = ctx.run_command("/something-else", "U1").await;
    assert_eq!(response.status(), 200);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ctx.slack.calls().await.is_empty());
}

#[tokio::test]
async fn test_url_verification_echoes_challenge() {
    let ctx = TestContext::spawn().await;

    let body = json!({
        "token": "legacy",
        "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P",
        "type": "url_verification"
    })
    .to_string();
    let response = ctx
        .post_signed("/slack/events", "application/json", body)
        .await;
    assert_eq!(response.status(), 200);

    let json: Value = response.json().await.unwrap();
    assert_eq!(
        json["challenge"],
        "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
    );
}

#[tokio::test]
async fn test_event_callback_is_acknowledged() {
    let ctx = TestContext::spawn().await;

    let body = json!({
        "type": "event_callback",
        "event_id": "Ev0001",
        "event": { "type": "app_mention", "user": "U1", "text": "hi" }
    })
    .to_string();
    let response = ctx
        .post_signed("/slack/events", "application/json", body)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_unsupported_interaction_is_acknowledged() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .interact(&json!({ "type": "shortcut", "callback_id": "x" }))
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_malformed_interaction_is_bad_request() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .post_signed("/slack/events", FORM, "payload=not-json".to_string())
        .await;
    assert_eq!(response.status(), 400);
}
