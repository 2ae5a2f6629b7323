//! Speech recognizer abstraction and the built-in implementations.
//!
//! A recognizer is an event source: once started it reports transcript
//! chunks in spoken order and finally an end event, all as
//! `DictationSignal`s on the sender it was started with.

use std::sync::Mutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use yazim_core::error::YazimError;

/// Messages delivered to the owner of a `DictationEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationSignal {
    /// A finalised transcript chunk.
    Transcript { session_id: Uuid, text: String },
    /// The recognizer ended (after `stop`, or on its own).
    Ended { session_id: Uuid },
    /// The recognizer reported an error and will not deliver more chunks.
    Failed { session_id: Uuid, message: String },
    /// The inactivity timer armed with `generation` elapsed.
    InactivityTimeout { session_id: Uuid, generation: u64 },
    /// The persistent-mode restart delay elapsed.
    RestartDue { session_id: Uuid },
}

impl DictationSignal {
    pub fn session_id(&self) -> Uuid {
        match self {
            DictationSignal::Transcript { session_id, .. }
            | DictationSignal::Ended { session_id }
            | DictationSignal::Failed { session_id, .. }
            | DictationSignal::InactivityTimeout { session_id, .. }
            | DictationSignal::RestartDue { session_id } => *session_id,
        }
    }
}

pub type SignalSender = mpsc::UnboundedSender<DictationSignal>;

/// A continuous speech-recognition session provider.
pub trait SpeechRecognizer: Send + Sync {
    /// Whether recognition can run at all in this environment.
    fn is_supported(&self) -> bool;

    /// Begin recognising. Every event for this run must carry `session_id`.
    fn start(&self, session_id: Uuid, signals: SignalSender) -> Result<(), YazimError>;

    /// Stop gracefully; an `Ended` event follows.
    fn stop(&self);

    /// Stop immediately without delivering further events.
    fn abort(&self);
}

/// Recognizer for environments without speech support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self, _session_id: Uuid, _signals: SignalSender) -> Result<(), YazimError> {
        Err(YazimError::SpeechUnavailable)
    }

    fn stop(&self) {}

    fn abort(&self) {}
}

#[derive(Debug, Default)]
struct ChannelState {
    active: Option<(Uuid, SignalSender)>,
    starts: usize,
    stops: usize,
    aborts: usize,
}

/// A recognizer whose "speech" is pushed in by the caller.
///
/// The terminal front end feeds it from `/say` lines; tests use it to script
/// transcript and end events.
#[derive(Debug, Default)]
pub struct ChannelRecognizer {
    state: Mutex<ChannelState>,
}

impl ChannelRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver a transcript chunk. Returns false when not listening.
    pub fn say(&self, text: &str) -> bool {
        let state = self.lock();
        match &state.active {
            Some((session_id, signals)) => signals
                .send(DictationSignal::Transcript {
                    session_id: *session_id,
                    text: text.to_string(),
                })
                .is_ok(),
            None => false,
        }
    }

    /// End the current run as if the recognizer timed out on its own.
    pub fn end(&self) -> bool {
        let mut state = self.lock();
        match state.active.take() {
            Some((session_id, signals)) => {
                signals.send(DictationSignal::Ended { session_id }).is_ok()
            }
            None => false,
        }
    }

    /// Fail the current run with `message`.
    pub fn fail(&self, message: &str) -> bool {
        let mut state = self.lock();
        match state.active.take() {
            Some((session_id, signals)) => signals
                .send(DictationSignal::Failed {
                    session_id,
                    message: message.to_string(),
                })
                .is_ok(),
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.lock().active.is_some()
    }

    pub fn start_count(&self) -> usize {
        self.lock().starts
    }

    pub fn stop_count(&self) -> usize {
        self.lock().stops
    }

    pub fn abort_count(&self) -> usize {
        self.lock().aborts
    }
}

impl SpeechRecognizer for ChannelRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, session_id: Uuid, signals: SignalSender) -> Result<(), YazimError> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(YazimError::Dictation(
                "Recognition is already running".to_string(),
            ));
        }
        state.active = Some((session_id, signals));
        state.starts += 1;
        Ok(())
    }

    fn stop(&self) {
        let mut state = self.lock();
        state.stops += 1;
        if let Some((session_id, signals)) = state.active.take() {
            let _ = signals.send(DictationSignal::Ended { session_id });
        }
    }

    fn abort(&self) {
        let mut state = self.lock();
        state.aborts += 1;
        state.active = None;
    }
}
