//! Session status transitions.
//!
//! Valid transitions:
//! - Waiting -> Typing (buffer became non-empty)
//! - Typing -> Waiting (buffer emptied again)
//! - Typing -> Paused, Paused -> Typing
//! - Typing -> Finished (finish with a non-blank buffer)
//! - Finished -> Typing (go back)
//!
//! A full reset to Waiting is allowed from anywhere and bypasses validation.

use yazim_core::error::YazimError;
use yazim_core::types::SessionStatus;

/// Returns whether a transition from `from` to `to` is valid.
pub fn can_transition(from: SessionStatus, to: SessionStatus) -> bool {
    matches!(
        (from, to),
        (SessionStatus::Waiting, SessionStatus::Typing)
            | (SessionStatus::Typing, SessionStatus::Waiting)
            | (SessionStatus::Typing, SessionStatus::Paused)
            | (SessionStatus::Paused, SessionStatus::Typing)
            | (SessionStatus::Typing, SessionStatus::Finished)
            | (SessionStatus::Finished, SessionStatus::Typing)
    )
}

/// Validate a transition, returning `YazimError::InvalidTransition` if it is
/// not allowed.
pub fn validate_transition(from: SessionStatus, to: SessionStatus) -> Result<(), YazimError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(YazimError::InvalidTransition { from, to })
    }
}

/// Whether direct text edits are accepted in this status.
pub fn accepts_input(status: SessionStatus) -> bool {
    matches!(status, SessionStatus::Waiting | SessionStatus::Typing)
}
