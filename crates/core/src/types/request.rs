//! Approval request and decision event.
//!
//! Neither type is persisted. An [`ApprovalRequest`] exists between a modal
//! submission and the message sent to the approver; from then on the only
//! trace of the requester is the value echoed back by the decision buttons.
//! A [`DecisionEvent`] is rebuilt from that echo when a button is pressed.

use serde::{Deserialize, Serialize};

use super::id::{ChannelId, MessageTs, UserId};
use super::status::{Decision, RequestStatus, TransitionError};

/// A request for approval, captured from a submitted modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// User who submitted the modal.
    pub requester: UserId,
    /// User picked to approve or reject.
    pub approver: UserId,
    /// Free-form description, possibly empty.
    pub description: String,
}

/// A button press on a pending request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// User who pressed the button.
    pub actor: UserId,
    /// Which button was pressed.
    pub decision: Decision,
    /// Channel holding the request message.
    pub origin_channel: ChannelId,
    /// Timestamp of the request message.
    pub origin_message_ts: MessageTs,
    /// Original requester, recovered from the button value.
    pub requester: UserId,
}

impl DecisionEvent {
    /// Status the request message moves to.
    ///
    /// Every event is applied to the request as it was rendered, i.e. still
    /// pending. Nothing remembers an earlier decision, so a second press on
    /// the same message yields its own outcome and the last update wins.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] only if the status machine rejects the
    /// move out of `Pending`, which does not happen for either decision.
    pub const fn outcome(&self) -> Result<RequestStatus, TransitionError> {
        RequestStatus::Pending.decide(self.decision)
    }
}
