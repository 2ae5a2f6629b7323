//! The session aggregate: status, text buffer, timing and edit history.
//!
//! `Session` is the single owner of the text buffer. Manual typing,
//! dictation inserts, AI-assisted edits and undo/redo all go through its
//! mutation methods, which keep the status/timing invariants:
//! - `Waiting` implies an empty buffer, no start time and zero accumulated time.
//! - `Typing` implies a start time is present.
//! - `Paused` implies no start time; accumulated time holds everything so far.
//!
//! Every method takes the current instant explicitly so callers (and tests)
//! control the clock.

use chrono::{DateTime, Duration, Utc};

use yazim_core::error::YazimError;
use yazim_core::types::{GrammarFeedback, SessionStatus, TypingStats};

use crate::history::EditHistory;
use crate::state;
use crate::stats::compute_stats;

/// What an edit did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Rejected because the session is paused or finished.
    Ignored,
    /// Buffer changed, status unchanged.
    Updated,
    /// First character arrived; Waiting -> Typing and the clock started.
    Started,
    /// Buffer emptied while typing; Typing -> Waiting and timing reset.
    Emptied,
}

/// Handed out by [`Session::finish`]: the exact text to analyse.
///
/// The feedback offsets index into `text`, which stays stored in the session
/// until the feedback is rendered even if the buffer changes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTicket {
    pub id: u64,
    pub epoch: u64,
    pub text: String,
    pub stats: TypingStats,
}

/// One practice/analysis attempt from reset to finish.
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    buffer: String,
    start_time: Option<DateTime<Utc>>,
    accumulated: Duration,
    history: EditHistory,
    epoch: u64,
    next_ticket: u64,
    pending_ticket: Option<u64>,
    stats: Option<TypingStats>,
    submitted_text: Option<String>,
    feedback: Option<GrammarFeedback>,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Waiting,
            buffer: String::new(),
            start_time: None,
            accumulated: Duration::zero(),
            history: EditHistory::new(),
            epoch: 0,
            next_ticket: 0,
            pending_ticket: None,
            stats: None,
            submitted_text: None,
            feedback: None,
            error: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Incremented on every reset. Async work tagged with an older epoch is stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn stats(&self) -> Option<&TypingStats> {
        self.stats.as_ref()
    }

    /// The exact text submitted for analysis by the last finish.
    pub fn submitted_text(&self) -> Option<&str> {
        self.submitted_text.as_deref()
    }

    pub fn feedback(&self) -> Option<&GrammarFeedback> {
        self.feedback.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True between `finish` and the arrival of its analysis result.
    pub fn is_analysis_pending(&self) -> bool {
        self.pending_ticket.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Total active time at `now`.
    ///
    /// While typing this includes the running interval; otherwise it is the
    /// accumulated time alone.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.start_time {
            Some(start) => self.accumulated + (now - start),
            None => self.accumulated,
        }
    }

    // =========================================================================
    // Text edits
    // =========================================================================

    /// Replace the buffer with typed input.
    pub fn input(&mut self, text: &str, now: DateTime<Utc>) -> InputOutcome {
        if !state::accepts_input(self.status) {
            tracing::debug!(status = %self.status, "Input ignored");
            return InputOutcome::Ignored;
        }
        self.apply_text(text.to_string(), now)
    }

    /// Append a dictation transcript chunk, preserving arrival order.
    ///
    /// With `separate` set, a single space is inserted when the buffer does
    /// not already end in whitespace.
    pub fn insert_transcript(
        &mut self,
        chunk: &str,
        separate: bool,
        now: DateTime<Utc>,
    ) -> InputOutcome {
        if !state::accepts_input(self.status) {
            tracing::debug!(status = %self.status, "Transcript ignored");
            return InputOutcome::Ignored;
        }
        let chunk = chunk.trim();
        if chunk.is_empty() {
            return InputOutcome::Ignored;
        }

        let mut text = self.buffer.clone();
        let needs_space = separate
            && !text.is_empty()
            && !text.chars().last().is_some_and(char::is_whitespace);
        if needs_space {
            text.push(' ');
        }
        text.push_str(chunk);
        self.apply_text(text, now)
    }

    /// Replace the buffer with the result of an AI-assisted mutation.
    pub fn apply_assisted(&mut self, text: &str, now: DateTime<Utc>) -> InputOutcome {
        self.input(text, now)
    }

    fn apply_text(&mut self, text: String, now: DateTime<Utc>) -> InputOutcome {
        self.buffer = text;
        match self.status {
            SessionStatus::Waiting if !self.buffer.is_empty() => {
                self.transition(SessionStatus::Typing);
                self.start_time = Some(now);
                self.accumulated = Duration::zero();
                InputOutcome::Started
            }
            SessionStatus::Typing if self.buffer.is_empty() => {
                self.transition(SessionStatus::Waiting);
                self.start_time = None;
                self.accumulated = Duration::zero();
                InputOutcome::Emptied
            }
            _ => InputOutcome::Updated,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Typing -> Paused. The running interval is folded into accumulated time.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), YazimError> {
        state::validate_transition(self.status, SessionStatus::Paused)?;
        if let Some(start) = self.start_time.take() {
            self.accumulated += now - start;
        }
        self.transition(SessionStatus::Paused);
        Ok(())
    }

    /// Paused -> Typing. A new interval starts; accumulated time is kept.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), YazimError> {
        self.require(SessionStatus::Paused, SessionStatus::Typing)?;
        self.start_time = Some(now);
        self.transition(SessionStatus::Typing);
        Ok(())
    }

    /// Whether `finish` would submit the text. Errors when the session is
    /// not typing; `Ok(false)` for a blank buffer.
    pub fn can_finish(&self) -> Result<bool, YazimError> {
        state::validate_transition(self.status, SessionStatus::Finished)?;
        Ok(!self.buffer.trim().is_empty())
    }

    /// Typing -> Finished.
    ///
    /// Returns `Ok(None)` without changing anything when the buffer is blank.
    /// Otherwise computes the statistics, stores the submitted text, marks the
    /// analysis as pending and returns the ticket to hand to the analyser.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<Option<AnalysisTicket>, YazimError> {
        if !self.can_finish()? {
            tracing::debug!("Finish ignored for blank buffer");
            return Ok(None);
        }

        let stats = compute_stats(&self.buffer, self.elapsed(now));
        self.start_time = None;
        self.transition(SessionStatus::Finished);

        self.next_ticket += 1;
        let ticket = AnalysisTicket {
            id: self.next_ticket,
            epoch: self.epoch,
            text: self.buffer.clone(),
            stats: stats.clone(),
        };
        self.pending_ticket = Some(ticket.id);
        self.stats = Some(stats);
        self.submitted_text = Some(ticket.text.clone());
        self.feedback = None;
        self.error = None;

        tracing::info!(
            ticket = ticket.id,
            wpm = ticket.stats.wpm,
            time_secs = ticket.stats.time_secs,
            "Session finished"
        );
        Ok(Some(ticket))
    }

    /// Finished -> Typing ("go back").
    ///
    /// Starts a fresh interval on top of whatever accumulated time was held
    /// at finish; the interval that ended at finish is not carried over.
    pub fn go_back(&mut self, now: DateTime<Utc>) -> Result<(), YazimError> {
        self.require(SessionStatus::Finished, SessionStatus::Typing)?;
        self.start_time = Some(now);
        self.pending_ticket = None;
        self.stats = None;
        self.submitted_text = None;
        self.feedback = None;
        self.error = None;
        self.transition(SessionStatus::Typing);
        Ok(())
    }

    /// Any -> Waiting. Clears everything and bumps the epoch.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        let next_ticket = self.next_ticket;
        *self = Self::new();
        self.epoch = epoch;
        self.next_ticket = next_ticket;
        tracing::info!(epoch, "Session reset");
    }

    /// Deliver the outcome of an analysis request.
    ///
    /// Returns `false` and changes nothing if `ticket_id` is not the pending
    /// one (the session went back, was reset, or finished again since).
    pub fn apply_analysis(
        &mut self,
        ticket_id: u64,
        result: Result<GrammarFeedback, String>,
    ) -> bool {
        if self.pending_ticket != Some(ticket_id) || self.status != SessionStatus::Finished {
            tracing::debug!(ticket = ticket_id, "Stale analysis result dropped");
            return false;
        }
        self.pending_ticket = None;
        match result {
            Ok(feedback) => {
                self.feedback = Some(feedback);
                self.error = None;
            }
            Err(message) => {
                self.feedback = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // =========================================================================
    // Edit history
    // =========================================================================

    /// Record the current buffer as a checkpoint.
    pub fn checkpoint(&mut self) -> bool {
        self.history.push(&self.buffer)
    }

    /// Step the history back and make that snapshot the buffer.
    ///
    /// Returns `None` when there is nothing to undo or edits are not accepted.
    pub fn undo(&mut self, now: DateTime<Utc>) -> Option<InputOutcome> {
        if !state::accepts_input(self.status) {
            return None;
        }
        let text = self.history.undo()?.to_string();
        Some(self.apply_text(text, now))
    }

    /// Step the history forward and make that snapshot the buffer.
    pub fn redo(&mut self, now: DateTime<Utc>) -> Option<InputOutcome> {
        if !state::accepts_input(self.status) {
            return None;
        }
        let text = self.history.redo()?.to_string();
        Some(self.apply_text(text, now))
    }

    /// Put the active snapshot back into the buffer without moving the cursor.
    pub fn restore_checkpoint(&mut self, now: DateTime<Utc>) -> InputOutcome {
        if !state::accepts_input(self.status) {
            return InputOutcome::Ignored;
        }
        let text = self.history.current().to_string();
        self.apply_text(text, now)
    }

    /// `Typing` is reachable from three states; resume and go-back each only
    /// accept one of them.
    fn require(&self, from: SessionStatus, to: SessionStatus) -> Result<(), YazimError> {
        if self.status != from {
            return Err(YazimError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        state::validate_transition(from, to)
    }

    fn transition(&mut self, to: SessionStatus) {
        tracing::debug!("Session status: {} -> {}", self.status, to);
        self.status = to;
    }
}

// =============================================================================
// Tests
// =============================================================================
