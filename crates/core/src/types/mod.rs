//! Core types for the approval bot.
//!
//! This module provides type-safe wrappers for the approval flow's concepts.

pub mod id;
pub mod request;
pub mod status;

pub use id::*;
pub use request::{ApprovalRequest, DecisionEvent};
pub use status::*;
