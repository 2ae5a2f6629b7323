use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AssistantOperation, SessionStatus, TypingStats};

/// All domain events that can occur during a writing session.
///
/// Events are emitted by the workbench after state changes and consumed by
/// the broadcast channel (terminal rendering, logging).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DomainEvent {
    // =========================================================================
    // Session Events
    // =========================================================================
    /// The session status moved from one state to another.
    StatusChanged {
        epoch: u64,
        from: SessionStatus,
        to: SessionStatus,
        timestamp: DateTime<Utc>,
    },

    /// The session was explicitly reset; everything was cleared.
    SessionReset {
        epoch: u64,
        timestamp: DateTime<Utc>,
    },

    /// Statistics were computed and the text was handed to analysis.
    SessionFinished {
        epoch: u64,
        stats: TypingStats,
        timestamp: DateTime<Utc>,
    },

    /// Grammar feedback arrived for the finished session.
    AnalysisCompleted {
        epoch: u64,
        score: u8,
        error_count: usize,
        timestamp: DateTime<Utc>,
    },

    // =========================================================================
    // Edit History Events
    // =========================================================================
    /// A snapshot was pushed onto the edit history.
    CheckpointPushed {
        index: usize,
        len: usize,
        timestamp: DateTime<Utc>,
    },

    /// Undo or redo moved the history pointer.
    HistoryMoved {
        index: usize,
        len: usize,
        timestamp: DateTime<Utc>,
    },

    // =========================================================================
    // Assistant Events
    // =========================================================================
    /// An AI-assisted mutation replaced the buffer.
    AssistedEditApplied {
        operation: AssistantOperation,
        text_length: usize,
        timestamp: DateTime<Utc>,
    },

    /// A call to the external service failed.
    AssistantFailed {
        operation: AssistantOperation,
        message: String,
        timestamp: DateTime<Utc>,
    },

    // =========================================================================
    // Dictation Events
    // =========================================================================
    /// A recognition session began.
    DictationStarted {
        session_id: Uuid,
        persistent: bool,
        timestamp: DateTime<Utc>,
    },

    /// A transcript chunk was appended to the buffer.
    TranscriptAppended {
        session_id: Uuid,
        text_length: usize,
        timestamp: DateTime<Utc>,
    },

    /// The recognizer ended on its own and was restarted (persistent mode).
    DictationRestarted {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Dictation ended; `spoken_length` characters were captured in total.
    DictationEnded {
        session_id: Uuid,
        spoken_length: usize,
        timestamp: DateTime<Utc>,
    },

    /// Dictation stopped after the inactivity timeout elapsed.
    DictationTimedOut {
        session_id: Uuid,
        timeout_secs: u32,
        timestamp: DateTime<Utc>,
    },

    // =========================================================================
    // Settings Events
    // =========================================================================
    /// User settings were written to the repository.
    SettingsSaved { timestamp: DateTime<Utc> },
}

impl DomainEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::StatusChanged { timestamp, .. }
            | DomainEvent::SessionReset { timestamp, .. }
            | DomainEvent::SessionFinished { timestamp, .. }
            | DomainEvent::AnalysisCompleted { timestamp, .. }
            | DomainEvent::CheckpointPushed { timestamp, .. }
            | DomainEvent::HistoryMoved { timestamp, .. }
            | DomainEvent::AssistedEditApplied { timestamp, .. }
            | DomainEvent::AssistantFailed { timestamp, .. }
            | DomainEvent::DictationStarted { timestamp, .. }
            | DomainEvent::TranscriptAppended { timestamp, .. }
            | DomainEvent::DictationRestarted { timestamp, .. }
            | DomainEvent::DictationEnded { timestamp, .. }
            | DomainEvent::DictationTimedOut { timestamp, .. }
            | DomainEvent::SettingsSaved { timestamp } => *timestamp,
        }
    }

    /// Returns a short event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            DomainEvent::StatusChanged { .. } => "status_changed",
            DomainEvent::SessionReset { .. } => "session_reset",
            DomainEvent::SessionFinished { .. } => "session_finished",
            DomainEvent::AnalysisCompleted { .. } => "analysis_completed",
            DomainEvent::CheckpointPushed { .. } => "checkpoint_pushed",
            DomainEvent::HistoryMoved { .. } => "history_moved",
            DomainEvent::AssistedEditApplied { .. } => "assisted_edit_applied",
            DomainEvent::AssistantFailed { .. } => "assistant_failed",
            DomainEvent::DictationStarted { .. } => "dictation_started",
            DomainEvent::TranscriptAppended { .. } => "transcript_appended",
            DomainEvent::DictationRestarted { .. } => "dictation_restarted",
            DomainEvent::DictationEnded { .. } => "dictation_ended",
            DomainEvent::DictationTimedOut { .. } => "dictation_timed_out",
            DomainEvent::SettingsSaved { .. } => "settings_saved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_event_timestamp() {
        let event = DomainEvent::SessionReset {
            epoch: 3,
            timestamp: ts(),
        };
        assert_eq!(event.timestamp(), ts());
    }

    #[test]
    fn test_event_name() {
        let event = DomainEvent::StatusChanged {
            epoch: 1,
            from: SessionStatus::Waiting,
            to: SessionStatus::Typing,
            timestamp: ts(),
        };
        assert_eq!(event.event_name(), "status_changed");

        let event = DomainEvent::DictationTimedOut {
            session_id: Uuid::new_v4(),
            timeout_secs: 5,
            timestamp: ts(),
        };
        assert_eq!(event.event_name(), "dictation_timed_out");
    }

    #[test]
    fn test_event_serialization() {
        let event = DomainEvent::SessionFinished {
            epoch: 2,
            stats: TypingStats {
                wpm: 4,
                time_secs: 30.0,
                word_count: 2,
            },
            timestamp: ts(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("SessionFinished"));
        let back: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_name(), "session_finished");
        assert_eq!(back.timestamp(), ts());
    }

    #[test]
    fn test_assistant_failed_event_carries_operation() {
        let event = DomainEvent::AssistantFailed {
            operation: AssistantOperation::Translation,
            message: "Metin çevrilirken bir hata oluştu.".to_string(),
            timestamp: ts(),
        };
        match event {
            DomainEvent::AssistantFailed { operation, .. } => {
                assert_eq!(operation, AssistantOperation::Translation)
            }
            _ => panic!("Expected AssistantFailed"),
        }
    }
}
