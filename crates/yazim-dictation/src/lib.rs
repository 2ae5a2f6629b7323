//! Yazım Dictation crate - speech-to-text lifecycle feeding the text buffer.
//!
//! Provides the dictation engine that drives a `SpeechRecognizer` through
//! Idle -> Listening (-> Restarting -> Listening)* -> Idle, keeps exactly one
//! inactivity timer per dictation session, and restarts recognition when
//! persistent mode is on. All recognizer and timer callbacks arrive as
//! `DictationSignal` messages tagged with the session id, so late callbacks
//! from a stopped session are recognised and dropped.

pub mod engine;
pub mod recognizer;
pub mod state;
pub mod timer;

pub use engine::{
    DictationEngine, DictationOptions, DictationOutcome, DictationSession, DictationUpdate, EndReason,
};
pub use recognizer::{
    ChannelRecognizer, DictationSignal, SignalSender, SpeechRecognizer, UnsupportedRecognizer,
};
pub use state::DictationState;
pub use timer::InactivityTimer;
