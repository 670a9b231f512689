//! Approval flow service.
//!
//! This service runs the three steps of an approval request, each one after
//! Slack has already been acknowledged:
//! 1. Slash command: open the request modal
//! 2. Modal submission: DM the approver a message with Approve/Reject buttons
//! 3. Button press: DM the requester the outcome and strip the buttons
//!
//! Failed Slack calls are logged where they happen and end the step. There
//! is no retry and no compensating action. Malformed payloads are returned
//! as errors for the global observer.

use approval_bot_core::{ApprovalRequest, ChannelId, DecisionEvent, UserId};
use tracing::{debug, error, info, instrument, warn};

use crate::error::AppError;
use crate::slack::{
    APPROVER_ACTION_ID, APPROVER_BLOCK_ID, BlockActions, DESCRIPTION_ACTION_ID,
    DESCRIPTION_BLOCK_ID, SlackClient, SlackError, SlashCommand, ViewSubmission,
    build_request_message, build_request_modal, decided_status_line, decision_for_action,
    decision_notification, request_fallback_text,
};

/// Result of recording a decision.
///
/// The two side effects are independent: either may have failed while the
/// other went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// Whether the requester was sent the outcome.
    pub requester_notified: bool,
    /// Whether the request message was rewritten without buttons.
    pub message_updated: bool,
}

/// Approval flow service.
#[derive(Debug, Clone)]
pub struct ApprovalService {
    slack: SlackClient,
}

impl ApprovalService {
    /// Create a new approval service.
    #[must_use]
    pub const fn new(slack: SlackClient) -> Self {
        Self { slack }
    }

    /// Open the request modal for a slash command invocation.
    ///
    /// Returns whether the modal was opened. A failure is logged and leaves
    /// the user without a form.
    #[instrument(skip(self, command), fields(user = %command.user_id))]
    pub async fn open_request_form(&self, command: &SlashCommand) -> bool {
        match self
            .slack
            .open_view(&command.trigger_id, build_request_modal())
            .await
        {
            Ok(_) => {
                info!("Opened approval request modal");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to open approval request modal");
                false
            }
        }
    }

    /// Send the approver a request message for a submitted modal.
    ///
    /// Exactly one message is sent per submission. A send failure is logged
    /// and the requester is not told.
    ///
    /// # Errors
    ///
    /// Returns error if the submission has no approver selected.
    #[instrument(skip(self, submission), fields(requester = %submission.user.id))]
    pub async fn submit_request(&self, submission: &ViewSubmission) -> Result<bool, AppError> {
        let request = request_from_submission(submission)?;

        let blocks = build_request_message(&request.requester, &request.description);
        let fallback = request_fallback_text(&request.requester);

        match self
            .slack
            .post_message(
                &ChannelId::direct(&request.approver),
                blocks,
                Some(&fallback),
            )
            .await
        {
            Ok(response) => {
                info!(
                    approver = %request.approver,
                    ts = ?response.ts,
                    "Sent approval request to approver"
                );
                Ok(true)
            }
            Err(e) => {
                error!(
                    approver = %request.approver,
                    error = %e,
                    "Failed to send approval request"
                );
                Ok(false)
            }
        }
    }

    /// Apply a button press: notify the requester, then rewrite the message.
    ///
    /// Both steps are always attempted. Nothing guards against a second
    /// press on the same message; it sends another notification and
    /// rewrites the message again, so the last press processed wins.
    ///
    /// # Errors
    ///
    /// Returns error if the decision cannot be mapped to a terminal status.
    #[instrument(
        skip(self, event),
        fields(actor = %event.actor, decision = %event.decision, requester = %event.requester)
    )]
    pub async fn record_decision(&self, event: &DecisionEvent) -> Result<DecisionOutcome, AppError> {
        let status = event.outcome()?;

        let notification = decision_notification(event.decision, &event.actor);
        let requester_notified = match self
            .slack
            .post_text(&ChannelId::direct(&event.requester), &notification)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to notify requester of decision");
                false
            }
        };

        let status_line = decided_status_line(status, &event.actor);
        let message_updated = match self
            .slack
            .update_message(
                &event.origin_channel,
                &event.origin_message_ts,
                Vec::new(),
                Some(&status_line),
            )
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to update request message");
                false
            }
        };

        info!(
            status = %status,
            requester_notified,
            message_updated,
            "Recorded decision"
        );

        Ok(DecisionOutcome {
            requester_notified,
            message_updated,
        })
    }
}

/// Build an [`ApprovalRequest`] from a submitted modal.
///
/// An empty description is allowed.
///
/// # Errors
///
/// Returns [`SlackError::InvalidPayload`] if no approver was selected.
pub fn request_from_submission(submission: &ViewSubmission) -> Result<ApprovalRequest, SlackError> {
    let state = &submission.view.state;

    let approver = state
        .get(APPROVER_BLOCK_ID, APPROVER_ACTION_ID)
        .and_then(|value| value.selected_user.clone())
        .ok_or_else(|| SlackError::InvalidPayload("submission has no approver".to_string()))?;

    let description = state
        .get(DESCRIPTION_BLOCK_ID, DESCRIPTION_ACTION_ID)
        .and_then(|value| value.value.clone())
        .unwrap_or_default();

    Ok(ApprovalRequest {
        requester: submission.user.id.clone(),
        approver,
        description,
    })
}

/// Build a [`DecisionEvent`] from a `block_actions` payload.
///
/// Returns `Ok(None)` when the first action is not one of the decision
/// buttons.
///
/// # Errors
///
/// Returns [`SlackError::InvalidPayload`] if the payload has no actions, the
/// button carries no requester, or the message coordinates are missing.
pub fn decision_from_actions(actions: &BlockActions) -> Result<Option<DecisionEvent>, SlackError> {
    let action = actions
        .actions
        .first()
        .ok_or_else(|| SlackError::InvalidPayload("no actions in payload".to_string()))?;

    let Some(decision) = decision_for_action(&action.action_id) else {
        debug!(action_id = %action.action_id, "Ignoring unrelated block action");
        return Ok(None);
    };

    let requester: UserId = action
        .value
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(UserId::from)
        .ok_or_else(|| SlackError::InvalidPayload("decision button has no requester".to_string()))?;

    let container = actions
        .container
        .as_ref()
        .ok_or_else(|| SlackError::InvalidPayload("payload has no container".to_string()))?;

    let origin_channel = container
        .channel_id
        .clone()
        .or_else(|| actions.channel.as_ref().map(|c| c.id.clone()))
        .ok_or_else(|| SlackError::InvalidPayload("container has no channel".to_string()))?;

    let origin_message_ts = container
        .message_ts
        .clone()
        .ok_or_else(|| SlackError::InvalidPayload("container has no message_ts".to_string()))?;

    if actions.actions.len() > 1 {
        warn!(count = actions.actions.len(), "Only the first action is processed");
    }

    Ok(Some(DecisionEvent {
        actor: actions.user.id.clone(),
        decision,
        origin_channel,
        origin_message_ts,
        requester,
    }))
}
