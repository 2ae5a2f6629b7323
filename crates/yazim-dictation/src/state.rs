//! Dictation state machine.
//!
//! Enforces valid state transitions for the dictation lifecycle:
//! - Idle -> Listening (start dictation)
//! - Listening -> Idle (user stop, inactivity timeout, cancel, recognizer end)
//! - Listening -> Restarting (recognizer ended on its own in persistent mode)
//! - Restarting -> Listening (recognition restarted)
//! - Restarting -> Idle (stopped or cancelled before the restart happened)

use std::fmt;

use yazim_core::error::YazimError;

/// Operational state of the dictation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DictationState {
    /// No dictation in progress. Ready to start.
    #[default]
    Idle,
    /// The recognizer is running and transcript chunks may arrive.
    Listening,
    /// The recognizer ended by itself and a restart is scheduled.
    Restarting,
}

impl fmt::Display for DictationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictationState::Idle => write!(f, "Idle"),
            DictationState::Listening => write!(f, "Listening"),
            DictationState::Restarting => write!(f, "Restarting"),
        }
    }
}

impl DictationState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &DictationState) -> bool {
        matches!(
            (self, target),
            (DictationState::Idle, DictationState::Listening)
                | (DictationState::Listening, DictationState::Idle)
                | (DictationState::Listening, DictationState::Restarting)
                | (DictationState::Restarting, DictationState::Listening)
                | (DictationState::Restarting, DictationState::Idle)
        )
    }

    /// True while a dictation session exists (listening or about to restart).
    pub fn is_active(&self) -> bool {
        !matches!(self, DictationState::Idle)
    }
}

/// Validated holder for the current `DictationState`.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: DictationState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DictationState {
        self.state
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns `YazimError::Dictation` if the transition is not allowed from
    /// the current state.
    pub fn transition(&mut self, target: DictationState) -> Result<(), YazimError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Dictation state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(YazimError::Dictation(format!(
                "Invalid state transition: {} -> {}",
                self.state, target
            )))
        }
    }

    /// Force the state machine back to Idle.
    pub fn reset(&mut self) {
        if self.state != DictationState::Idle {
            tracing::debug!("Dictation state machine reset to Idle from {}", self.state);
        }
        self.state = DictationState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(DictationState::Idle.to_string(), "Idle");
        assert_eq!(DictationState::Listening.to_string(), "Listening");
        assert_eq!(DictationState::Restarting.to_string(), "Restarting");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(DictationState::Idle.can_transition_to(&DictationState::Listening));
        assert!(DictationState::Listening.can_transition_to(&DictationState::Idle));
        assert!(DictationState::Listening.can_transition_to(&DictationState::Restarting));
        assert!(DictationState::Restarting.can_transition_to(&DictationState::Listening));
        assert!(DictationState::Restarting.can_transition_to(&DictationState::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!DictationState::Idle.can_transition_to(&DictationState::Restarting));
        assert!(!DictationState::Idle.can_transition_to(&DictationState::Idle));
        assert!(!DictationState::Listening.can_transition_to(&DictationState::Listening));
        assert!(!DictationState::Restarting.can_transition_to(&DictationState::Restarting));
    }

    #[test]
    fn test_state_machine_persistent_cycle() {
        let mut sm = StateMachine::new();
        sm.transition(DictationState::Listening).unwrap();
        sm.transition(DictationState::Restarting).unwrap();
        sm.transition(DictationState::Listening).unwrap();
        sm.transition(DictationState::Idle).unwrap();
        assert_eq!(sm.current(), DictationState::Idle);
    }

    #[test]
    fn test_state_machine_transition_error_message() {
        let mut sm = StateMachine::new();
        match sm.transition(DictationState::Restarting) {
            Err(YazimError::Dictation(msg)) => {
                assert!(msg.contains("Idle"));
                assert!(msg.contains("Restarting"));
            }
            _ => panic!("Expected Dictation error variant"),
        }
        assert_eq!(sm.current(), DictationState::Idle);
    }

    #[test]
    fn test_state_machine_reset() {
        let mut sm = StateMachine::new();
        sm.transition(DictationState::Listening).unwrap();
        sm.reset();
        assert_eq!(sm.current(), DictationState::Idle);
        assert!(!sm.current().is_active());
    }
}
