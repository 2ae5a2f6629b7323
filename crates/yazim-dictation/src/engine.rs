//! Dictation engine managing the full dictation lifecycle.
//!
//! The `DictationEngine` owns the recognizer handle, the state machine, the
//! active `DictationSession` and its single inactivity timer. The engine
//! never touches the text buffer: transcript chunks and end outcomes are
//! returned to the caller, which applies them to the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use yazim_core::error::YazimError;

use crate::recognizer::{DictationSignal, SignalSender, SpeechRecognizer};
use crate::state::{DictationState, StateMachine};
use crate::timer::InactivityTimer;

/// Per-session dictation options, usually taken from the user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictationOptions {
    /// Restart recognition when it ends on its own.
    pub persistent: bool,
    /// Auto-stop after this many seconds without a transcript. 0 disables.
    pub timeout_secs: u32,
    /// Pause before restarting in persistent mode.
    pub restart_delay: Duration,
}

impl Default for DictationOptions {
    fn default() -> Self {
        Self {
            persistent: false,
            timeout_secs: yazim_core::settings::DEFAULT_DICTATION_TIMEOUT_SECS,
            restart_delay: Duration::from_millis(250),
        }
    }
}

/// Tracks the data associated with an active dictation session.
#[derive(Debug, Clone)]
pub struct DictationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub options: DictationOptions,
    /// Every chunk received so far, space separated.
    pub spoken: String,
    /// Set by `stop` and by the inactivity timeout; suppresses restarts.
    pub user_stopped: bool,
    pub restarts: u32,
}

impl DictationSession {
    pub fn new(options: DictationOptions, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            options,
            spoken: String::new(),
            user_stopped: false,
            restarts: 0,
        }
    }
}

/// Why a dictation session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    UserStopped,
    TimedOut,
    RecognizerEnded,
    Failed(String),
    Cancelled,
}

/// Summary of a finished dictation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictationOutcome {
    pub session_id: Uuid,
    pub spoken: String,
    pub reason: EndReason,
}

impl DictationOutcome {
    /// Whether any non-blank speech was captured.
    pub fn has_speech(&self) -> bool {
        !self.spoken.trim().is_empty()
    }
}

/// What a handled signal means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationUpdate {
    /// Append this chunk to the buffer.
    Transcript(String),
    /// The session is over.
    Ended(DictationOutcome),
}

pub struct DictationEngine {
    recognizer: Arc<dyn SpeechRecognizer>,
    signals: SignalSender,
    state: StateMachine,
    session: Option<DictationSession>,
    timer: InactivityTimer,
    restart: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for DictationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictationEngine")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("timer", &self.timer)
            .finish()
    }
}

impl DictationEngine {
    /// Create an idle engine. Recognizer and timer events are sent on `signals`.
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, signals: SignalSender) -> Self {
        Self {
            recognizer,
            signals,
            state: StateMachine::new(),
            session: None,
            timer: InactivityTimer::new(),
            restart: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn current_state(&self) -> DictationState {
        self.state.current()
    }

    pub fn is_active(&self) -> bool {
        self.state.current().is_active()
    }

    pub fn current_session(&self) -> Option<&DictationSession> {
        self.session.as_ref()
    }

    pub fn timer(&self) -> &InactivityTimer {
        &self.timer
    }

    fn is_current(&self, session_id: Uuid) -> bool {
        self.session.as_ref().is_some_and(|s| s.id == session_id)
    }

    /// Start a new dictation session.
    ///
    /// Fails with `SpeechUnavailable` when the recognizer is not supported and
    /// with `Dictation` when a session is already running.
    pub fn start(
        &mut self,
        options: DictationOptions,
        now: DateTime<Utc>,
    ) -> Result<Uuid, YazimError> {
        if !self.recognizer.is_supported() {
            return Err(YazimError::SpeechUnavailable);
        }
        self.state.transition(DictationState::Listening)?;

        let session = DictationSession::new(options, now);
        let session_id = session.id;
        if let Err(e) = self.recognizer.start(session_id, self.signals.clone()) {
            self.state.reset();
            return Err(e);
        }

        tracing::info!(
            %session_id,
            persistent = options.persistent,
            timeout_secs = options.timeout_secs,
            "Dictation session started"
        );
        self.session = Some(session);
        self.arm_timer();
        Ok(session_id)
    }

    /// User-requested stop. Returns the outcome, or `None` if idle.
    pub fn stop(&mut self) -> Option<DictationOutcome> {
        let session = self.session.as_mut()?;
        session.user_stopped = true;
        self.recognizer.stop();
        self.finalize(EndReason::UserStopped)
    }

    /// Abort recognition without waiting for further events.
    ///
    /// Used before finishing a practice session and on reset.
    pub fn cancel(&mut self) -> Option<DictationOutcome> {
        self.session.as_ref()?;
        self.recognizer.abort();
        self.finalize(EndReason::Cancelled)
    }

    /// Route a signal to the matching handler.
    pub fn handle(&mut self, signal: DictationSignal) -> Option<DictationUpdate> {
        match signal {
            DictationSignal::Transcript { session_id, text } => self
                .on_transcript(session_id, &text)
                .map(DictationUpdate::Transcript),
            DictationSignal::Ended { session_id } => {
                self.on_end(session_id).map(DictationUpdate::Ended)
            }
            DictationSignal::Failed {
                session_id,
                message,
            } => self
                .on_failure(session_id, message)
                .map(DictationUpdate::Ended),
            DictationSignal::InactivityTimeout {
                session_id,
                generation,
            } => self
                .on_inactivity_timeout(session_id, generation)
                .map(DictationUpdate::Ended),
            DictationSignal::RestartDue { session_id } => self
                .on_restart_due(session_id)
                .map(DictationUpdate::Ended),
        }
    }

    /// A transcript chunk arrived. Returns the trimmed chunk to insert.
    ///
    /// Re-arms the inactivity timer. Chunks from a stale session or arriving
    /// while not listening are dropped.
    pub fn on_transcript(&mut self, session_id: Uuid, text: &str) -> Option<String> {
        if !self.is_current(session_id) || self.state.current() != DictationState::Listening {
            tracing::debug!(%session_id, "Dropping transcript from inactive session");
            return None;
        }
        let chunk = text.trim();
        if chunk.is_empty() {
            return None;
        }
        if let Some(session) = self.session.as_mut() {
            if !session.spoken.is_empty() {
                session.spoken.push(' ');
            }
            session.spoken.push_str(chunk);
        }
        self.arm_timer();
        Some(chunk.to_string())
    }

    /// The recognizer ended.
    ///
    /// In persistent mode, unless the user stopped it, a restart is scheduled
    /// and `None` is returned. Otherwise the session ends.
    pub fn on_end(&mut self, session_id: Uuid) -> Option<DictationOutcome> {
        if !self.is_current(session_id) {
            return None;
        }
        let (persistent, user_stopped, delay) = match self.session.as_ref() {
            Some(s) => (s.options.persistent, s.user_stopped, s.options.restart_delay),
            None => return None,
        };

        if persistent && !user_stopped && self.state.transition(DictationState::Restarting).is_ok()
        {
            self.schedule_restart(session_id, delay);
            return None;
        }
        self.finalize(EndReason::RecognizerEnded)
    }

    /// The restart delay elapsed. Returns an outcome only if restarting failed.
    pub fn on_restart_due(&mut self, session_id: Uuid) -> Option<DictationOutcome> {
        if !self.is_current(session_id) || self.state.current() != DictationState::Restarting {
            return None;
        }
        self.restart = None;

        match self.recognizer.start(session_id, self.signals.clone()) {
            Ok(()) => {
                if let Some(session) = self.session.as_mut() {
                    session.restarts += 1;
                    tracing::debug!(%session_id, restarts = session.restarts, "Dictation restarted");
                }
                if let Err(e) = self.state.transition(DictationState::Listening) {
                    tracing::warn!(error = %e, "Restart left dictation in an unexpected state");
                }
                None
            }
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "Failed to restart dictation");
                self.finalize(EndReason::Failed(e.to_string()))
            }
        }
    }

    /// The inactivity timer fired. Stale generations are ignored.
    pub fn on_inactivity_timeout(
        &mut self,
        session_id: Uuid,
        generation: u64,
    ) -> Option<DictationOutcome> {
        if !self.is_current(session_id) || !self.timer.is_current(generation) {
            tracing::debug!(%session_id, generation, "Ignoring stale inactivity timeout");
            return None;
        }
        if let Some(session) = self.session.as_mut() {
            session.user_stopped = true;
        }
        self.recognizer.stop();
        self.finalize(EndReason::TimedOut)
    }

    /// The recognizer reported an error.
    pub fn on_failure(&mut self, session_id: Uuid, message: String) -> Option<DictationOutcome> {
        if !self.is_current(session_id) {
            return None;
        }
        tracing::warn!(%session_id, error = %message, "Speech recognition failed");
        self.recognizer.abort();
        self.finalize(EndReason::Failed(message))
    }

    fn arm_timer(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.options.timeout_secs == 0 {
            return;
        }
        let timeout = Duration::from_secs(u64::from(session.options.timeout_secs));
        self.timer.arm(session.id, timeout, self.signals.clone());
    }

    fn schedule_restart(&mut self, session_id: Uuid, delay: Duration) {
        let signals = self.signals.clone();
        if let Some(previous) = self.restart.take() {
            previous.abort();
        }
        self.restart = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = signals.send(DictationSignal::RestartDue { session_id });
        }));
    }

    fn finalize(&mut self, reason: EndReason) -> Option<DictationOutcome> {
        self.timer.cancel();
        if let Some(restart) = self.restart.take() {
            restart.abort();
        }
        self.state.reset();

        let session = self.session.take()?;
        tracing::info!(
            session_id = %session.id,
            reason = ?reason,
            spoken_length = session.spoken.chars().count(),
            restarts = session.restarts,
            "Dictation session ended"
        );
        Some(DictationOutcome {
            session_id: session.id,
            spoken: session.spoken,
            reason,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
