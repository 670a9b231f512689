//! Business logic services.
//!
//! - [`approval`] - The approval request lifecycle (modal, request message, decision)

pub mod approval;

pub use approval::{
    ApprovalService, DecisionOutcome, decision_from_actions, request_from_submission,
};
