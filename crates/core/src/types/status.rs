//! Decision and request status enums.
//!
//! An approval request moves through a tiny state machine:
//!
//! ```text
//! Pending --approve--> Approved
//! Pending --reject---> Rejected
//! ```
//!
//! Both outcomes are terminal. The bot never stores this state; it only uses
//! the transition to derive what a decided message should say.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The approver's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Lowercase past participle used in notifications ("approved").
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Lifecycle status of an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Attempted transition out of a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request already {from}, cannot {decision}")]
pub struct TransitionError {
    pub from: RequestStatus,
    pub decision: Decision,
}

impl RequestStatus {
    /// Apply a decision to a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the request has already been decided.
    pub const fn decide(self, decision: Decision) -> Result<Self, TransitionError> {
        match (self, decision) {
            (Self::Pending, Decision::Approve) => Ok(Self::Approved),
            (Self::Pending, Decision::Reject) => Ok(Self::Rejected),
            (from, decision) => Err(TransitionError { from, decision }),
        }
    }

    /// Capitalized label for a terminal status line ("Approved").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}
