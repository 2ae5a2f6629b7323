//! The workbench: one writing session, its dictation and its assistant calls.
//!
//! Every public operation runs on the caller's task and mutates state
//! directly. Long-running work (assistant calls, recognition, timers) runs
//! elsewhere and reports back through `next_message`, which the owner feeds
//! into `handle`. Results that arrive after a reset, a go-back or a newer
//! request of the same kind are recognised by their token and dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use yazim_assistant::{
    AssistantError, EnhanceRequest, GrammarRequest, TranslationDirection, WritingAssistant,
};
use yazim_core::clock::Clock;
use yazim_core::config::DictationConfig;
use yazim_core::error::YazimError;
use yazim_core::events::DomainEvent;
use yazim_core::settings::Settings;
use yazim_core::types::{AssistantOperation, SessionStatus};
use yazim_dictation::{
    DictationEngine, DictationOptions, DictationOutcome, DictationSignal, DictationUpdate,
    EndReason, SpeechRecognizer,
};
use yazim_session::{state, InputOutcome, Session};
use yazim_storage::SettingsRepository;

use crate::message::{AssistantOutput, WorkbenchMessage};
use crate::snapshot::WorkbenchSnapshot;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Operations whose result replaces the buffer.
const ASSISTED_EDITS: [AssistantOperation; 3] = [
    AssistantOperation::Translation,
    AssistantOperation::PromptEnhancement,
    AssistantOperation::AutoCorrection,
];

const ALL_OPERATIONS: [AssistantOperation; 5] = [
    AssistantOperation::GrammarCheck,
    AssistantOperation::Translation,
    AssistantOperation::LanguageDetection,
    AssistantOperation::PromptEnhancement,
    AssistantOperation::AutoCorrection,
];

/// Process-level knobs that are not user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchOptions {
    /// Insert a space between consecutive dictation chunks.
    pub separate_chunks: bool,
    /// Pause before persistent dictation restarts the recognizer.
    pub restart_delay: Duration,
}

impl WorkbenchOptions {
    pub fn from_config(config: &DictationConfig) -> Self {
        Self {
            separate_chunks: config.separate_chunks,
            restart_delay: Duration::from_millis(config.restart_delay_ms),
        }
    }
}

impl Default for WorkbenchOptions {
    fn default() -> Self {
        Self::from_config(&DictationConfig::default())
    }
}

struct InFlight {
    token: u64,
    /// Analysis ticket, for grammar checks only.
    ticket: Option<u64>,
    handle: JoinHandle<()>,
}

pub struct Workbench {
    assistant: Arc<dyn WritingAssistant>,
    repository: Arc<dyn SettingsRepository>,
    clock: Arc<dyn Clock>,
    options: WorkbenchOptions,
    settings: Settings,
    session: Session,
    dictation: DictationEngine,
    auto_correct: bool,
    persistent_dictation: bool,
    in_flight: HashMap<AssistantOperation, InFlight>,
    next_token: u64,
    messages_tx: mpsc::UnboundedSender<WorkbenchMessage>,
    messages_rx: mpsc::UnboundedReceiver<WorkbenchMessage>,
    signals_rx: mpsc::UnboundedReceiver<DictationSignal>,
    events: broadcast::Sender<DomainEvent>,
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("session", &self.session)
            .field("dictation", &self.dictation)
            .field("auto_correct", &self.auto_correct)
            .field("persistent_dictation", &self.persistent_dictation)
            .field("in_flight", &self.in_flight.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Workbench {
    /// Load the user settings and build an idle workbench.
    ///
    /// The auto-correct and persistent-dictation toggles start from the
    /// saved defaults.
    pub fn new(
        assistant: Arc<dyn WritingAssistant>,
        repository: Arc<dyn SettingsRepository>,
        recognizer: Arc<dyn SpeechRecognizer>,
        clock: Arc<dyn Clock>,
        options: WorkbenchOptions,
    ) -> Result<Self, YazimError> {
        let settings = repository.load()?;
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            tier = ?settings.model_tier,
            documents = settings.documents.len(),
            speech = recognizer.is_supported(),
            "Workbench ready"
        );

        Ok(Self {
            assistant,
            repository,
            clock,
            options,
            auto_correct: settings.default_auto_correct,
            persistent_dictation: settings.default_persistent_dictation,
            settings,
            session: Session::new(),
            dictation: DictationEngine::new(recognizer, signals_tx),
            in_flight: HashMap::new(),
            next_token: 0,
            messages_tx,
            messages_rx,
            signals_rx,
            events,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn dictation(&self) -> &DictationEngine {
        &self.dictation
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn auto_correct(&self) -> bool {
        self.auto_correct
    }

    pub fn persistent_dictation(&self) -> bool {
        self.persistent_dictation
    }

    pub fn is_busy(&self, operation: AssistantOperation) -> bool {
        self.in_flight.contains_key(&operation)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    /// Everything a front end needs to draw the current state.
    pub fn snapshot(&self) -> WorkbenchSnapshot {
        let now = self.clock.now();
        WorkbenchSnapshot {
            epoch: self.session.epoch(),
            status: self.session.status(),
            buffer: self.session.buffer().to_string(),
            elapsed_secs: self.session.elapsed(now).num_milliseconds().max(0) as f64 / 1000.0,
            stats: self.session.stats().cloned(),
            submitted_text: self.session.submitted_text().map(str::to_string),
            feedback: self.session.feedback().cloned(),
            error: self.session.error().map(str::to_string),
            loading: self.session.is_analysis_pending(),
            busy: ALL_OPERATIONS
                .into_iter()
                .filter(|op| self.is_busy(*op))
                .collect(),
            can_undo: self.session.can_undo(),
            can_redo: self.session.can_redo(),
            dictation: self.dictation.current_state(),
            auto_correct: self.auto_correct,
            persistent_dictation: self.persistent_dictation,
            model_tier: self.settings.model_tier,
        }
    }

    // =========================================================================
    // Typing and lifecycle
    // =========================================================================

    /// Replace the buffer with typed text.
    ///
    /// Ignored while the session is paused or finished, and while an
    /// assisted edit is waiting to replace the buffer.
    pub fn type_text(&mut self, text: &str) -> InputOutcome {
        if let Some(operation) = self.assisted_edit_in_flight() {
            debug!(%operation, "Input ignored while an assisted edit is running");
            return InputOutcome::Ignored;
        }
        let before = self.session.status();
        let outcome = self.session.input(text, self.clock.now());
        self.emit_status_change(before);
        outcome
    }

    /// Pause the clock. Active dictation is cancelled.
    pub fn pause(&mut self) -> Result<(), YazimError> {
        self.ensure_no_assisted_edit()?;
        let before = self.session.status();
        self.session.pause(self.clock.now())?;
        if let Some(outcome) = self.dictation.cancel() {
            self.dictation_ended(outcome, false);
        }
        self.emit_status_change(before);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), YazimError> {
        let before = self.session.status();
        self.session.resume(self.clock.now())?;
        self.emit_status_change(before);
        Ok(())
    }

    /// Finish the session and send the text for analysis.
    ///
    /// Dictation is cancelled once the finish is accepted, before the text is
    /// captured, so no chunk lands after submission. A rejected or blank
    /// finish leaves dictation running. Returns the analysis ticket, or
    /// `None` for a blank buffer.
    pub fn finish(&mut self) -> Result<Option<u64>, YazimError> {
        if self.is_busy(AssistantOperation::GrammarCheck) {
            return Err(YazimError::InProgress(AssistantOperation::GrammarCheck));
        }
        self.ensure_no_assisted_edit()?;
        if !self.session.can_finish()? {
            debug!("Finish ignored for blank buffer");
            return Ok(None);
        }
        if let Some(outcome) = self.dictation.cancel() {
            self.dictation_ended(outcome, false);
        }

        let before = self.session.status();
        let now = self.clock.now();
        let Some(ticket) = self.session.finish(now)? else {
            return Ok(None);
        };
        self.emit_status_change(before);
        if let Some(stats) = self.session.stats() {
            self.emit(DomainEvent::SessionFinished {
                epoch: ticket.epoch,
                stats: stats.clone(),
                timestamp: now,
            });
        }

        let request = GrammarRequest::new(ticket.text, &self.settings);
        let assistant = Arc::clone(&self.assistant);
        self.spawn(AssistantOperation::GrammarCheck, Some(ticket.id), async move {
            assistant
                .check_grammar(&request)
                .await
                .map(AssistantOutput::Feedback)
                .map_err(|e| failure(AssistantOperation::GrammarCheck, e))
        });
        Ok(Some(ticket.id))
    }

    /// Leave the results view and keep typing. A pending analysis is dropped.
    pub fn go_back(&mut self) -> Result<(), YazimError> {
        let before = self.session.status();
        self.session.go_back(self.clock.now())?;
        self.abort(AssistantOperation::GrammarCheck);
        self.emit_status_change(before);
        Ok(())
    }

    /// Clear everything. In-flight calls and recognition are abandoned.
    pub fn reset(&mut self) {
        for (operation, flight) in self.in_flight.drain() {
            debug!(%operation, token = flight.token, "Aborting in-flight call");
            flight.handle.abort();
        }
        if let Some(outcome) = self.dictation.cancel() {
            self.emit(DomainEvent::DictationEnded {
                session_id: outcome.session_id,
                spoken_length: outcome.spoken.chars().count(),
                timestamp: self.clock.now(),
            });
        }
        self.session.reset();
        self.emit(DomainEvent::SessionReset {
            epoch: self.session.epoch(),
            timestamp: self.clock.now(),
        });
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Returns whether the buffer moved.
    pub fn undo(&mut self) -> bool {
        self.move_history(true)
    }

    pub fn redo(&mut self) -> bool {
        self.move_history(false)
    }

    fn move_history(&mut self, back: bool) -> bool {
        if self.assisted_edit_in_flight().is_some() {
            return false;
        }
        let before = self.session.status();
        let now = self.clock.now();
        let moved = if back {
            self.session.undo(now)
        } else {
            self.session.redo(now)
        };
        if moved.is_none() {
            return false;
        }
        let history = self.session.history();
        self.emit(DomainEvent::HistoryMoved {
            index: history.index(),
            len: history.len(),
            timestamp: now,
        });
        self.emit_status_change(before);
        true
    }

    fn push_checkpoint(&mut self) {
        if self.session.checkpoint() {
            let history = self.session.history();
            self.emit(DomainEvent::CheckpointPushed {
                index: history.index(),
                len: history.len(),
                timestamp: self.clock.now(),
            });
        }
    }

    // =========================================================================
    // Assisted edits
    // =========================================================================

    /// Detect the buffer's language and translate it the other way.
    ///
    /// Returns `Ok(false)` when there is nothing to translate.
    pub fn translate(&mut self) -> Result<bool, YazimError> {
        let Some(text) = self.assisted_edit_source()? else {
            return Ok(false);
        };
        self.session.clear_error();
        self.push_checkpoint();

        let tier = self.settings.model_tier;
        let assistant = Arc::clone(&self.assistant);
        self.spawn(AssistantOperation::Translation, None, async move {
            let language = assistant
                .detect_language(&text, tier)
                .await
                .map_err(|e| failure(AssistantOperation::LanguageDetection, e))?;
            let direction = TranslationDirection::for_source(language);
            debug!(?language, ?direction, "Translating buffer");
            assistant
                .translate(&text, direction, tier)
                .await
                .map(AssistantOutput::Text)
                .map_err(|e| failure(AssistantOperation::Translation, e))
        });
        Ok(true)
    }

    /// Rewrite the buffer as a better prompt.
    pub fn enhance_prompt(&mut self) -> Result<bool, YazimError> {
        let Some(text) = self.assisted_edit_source()? else {
            return Ok(false);
        };
        self.session.clear_error();
        self.push_checkpoint();

        let request = EnhanceRequest::new(text, &self.settings);
        let assistant = Arc::clone(&self.assistant);
        self.spawn(AssistantOperation::PromptEnhancement, None, async move {
            assistant
                .enhance_prompt(&request)
                .await
                .map(AssistantOutput::Text)
                .map_err(|e| failure(AssistantOperation::PromptEnhancement, e))
        });
        Ok(true)
    }

    fn start_auto_correction(&mut self) {
        let text = match self.assisted_edit_source() {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "Auto-correct skipped");
                return;
            }
        };
        self.session.clear_error();
        self.push_checkpoint();

        let request = GrammarRequest::new(text, &self.settings);
        let assistant = Arc::clone(&self.assistant);
        self.spawn(AssistantOperation::AutoCorrection, None, async move {
            assistant
                .check_grammar(&request)
                .await
                .map(AssistantOutput::Feedback)
                .map_err(|e| failure(AssistantOperation::AutoCorrection, e))
        });
    }

    /// The buffer to send for an assisted edit, or `None` if there is nothing
    /// to send. Errors if another assisted edit is running.
    fn assisted_edit_source(&self) -> Result<Option<String>, YazimError> {
        self.ensure_no_assisted_edit()?;
        if !state::accepts_input(self.session.status()) || self.session.buffer().trim().is_empty()
        {
            return Ok(None);
        }
        Ok(Some(self.session.buffer().to_string()))
    }

    fn assisted_edit_in_flight(&self) -> Option<AssistantOperation> {
        ASSISTED_EDITS.into_iter().find(|op| self.is_busy(*op))
    }

    fn ensure_no_assisted_edit(&self) -> Result<(), YazimError> {
        match self.assisted_edit_in_flight() {
            Some(operation) => Err(YazimError::InProgress(operation)),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Dictation
    // =========================================================================

    /// Start listening with the current toggles and the saved timeout.
    pub fn start_dictation(&mut self) -> Result<Uuid, YazimError> {
        let status = self.session.status();
        if !state::accepts_input(status) {
            return Err(YazimError::Dictation(format!(
                "Cannot dictate while the session is {}",
                status
            )));
        }
        let options = DictationOptions {
            persistent: self.persistent_dictation,
            timeout_secs: self.settings.dictation_timeout_secs,
            restart_delay: self.options.restart_delay,
        };
        let now = self.clock.now();
        let session_id = self.dictation.start(options, now)?;
        self.emit(DomainEvent::DictationStarted {
            session_id,
            persistent: options.persistent,
            timestamp: now,
        });
        Ok(session_id)
    }

    /// User stop. Returns the outcome, or `None` if nothing was running.
    pub fn stop_dictation(&mut self) -> Option<DictationOutcome> {
        let outcome = self.dictation.stop()?;
        self.dictation_ended(outcome.clone(), true);
        Some(outcome)
    }

    /// Start or stop. Returns whether dictation is now running.
    pub fn toggle_dictation(&mut self) -> Result<bool, YazimError> {
        if self.dictation.is_active() {
            self.stop_dictation();
            Ok(false)
        } else {
            self.start_dictation()?;
            Ok(true)
        }
    }

    pub fn set_auto_correct(&mut self, enabled: bool) {
        debug!(enabled, "Auto-correct toggled");
        self.auto_correct = enabled;
    }

    /// Takes effect from the next dictation session.
    pub fn set_persistent_dictation(&mut self, enabled: bool) {
        debug!(enabled, "Persistent dictation toggled");
        self.persistent_dictation = enabled;
    }

    fn on_dictation(&mut self, signal: DictationSignal) {
        let session_id = signal.session_id();
        let restarts_before = self.dictation_restarts();

        match self.dictation.handle(signal) {
            Some(DictationUpdate::Transcript(chunk)) => {
                let before = self.session.status();
                let outcome = self.session.insert_transcript(
                    &chunk,
                    self.options.separate_chunks,
                    self.clock.now(),
                );
                if outcome != InputOutcome::Ignored {
                    self.emit_status_change(before);
                    self.emit(DomainEvent::TranscriptAppended {
                        session_id,
                        text_length: chunk.chars().count(),
                        timestamp: self.clock.now(),
                    });
                }
            }
            Some(DictationUpdate::Ended(outcome)) => self.dictation_ended(outcome, true),
            None => {
                if self.dictation_restarts() > restarts_before {
                    self.emit(DomainEvent::DictationRestarted {
                        session_id,
                        timestamp: self.clock.now(),
                    });
                }
            }
        }
    }

    fn dictation_restarts(&self) -> u32 {
        self.dictation.current_session().map_or(0, |s| s.restarts)
    }

    /// Checkpoint captured speech and, if enabled, send it for auto-correct.
    fn dictation_ended(&mut self, outcome: DictationOutcome, allow_auto_correct: bool) {
        let now = self.clock.now();
        if outcome.reason == EndReason::TimedOut {
            self.emit(DomainEvent::DictationTimedOut {
                session_id: outcome.session_id,
                timeout_secs: self.settings.dictation_timeout_secs,
                timestamp: now,
            });
        }
        self.emit(DomainEvent::DictationEnded {
            session_id: outcome.session_id,
            spoken_length: outcome.spoken.chars().count(),
            timestamp: now,
        });

        if !outcome.has_speech() {
            return;
        }
        self.push_checkpoint();
        if allow_auto_correct && self.auto_correct {
            self.start_auto_correction();
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Persist `settings`. The toggles snap to the new defaults.
    pub fn save_settings(&mut self, settings: Settings) -> Result<(), YazimError> {
        self.repository.save(&settings)?;
        self.auto_correct = settings.default_auto_correct;
        self.persistent_dictation = settings.default_persistent_dictation;
        self.settings = settings;
        info!(
            documents = self.settings.documents.len(),
            tier = ?self.settings.model_tier,
            "Settings saved"
        );
        self.emit(DomainEvent::SettingsSaved {
            timestamp: self.clock.now(),
        });
        Ok(())
    }

    // =========================================================================
    // Message loop
    // =========================================================================

    /// Wait for the next completion or recognition message.
    pub async fn next_message(&mut self) -> Option<WorkbenchMessage> {
        tokio::select! {
            Some(message) = self.messages_rx.recv() => Some(message),
            Some(signal) = self.signals_rx.recv() => Some(WorkbenchMessage::Dictation(signal)),
            else => None,
        }
    }

    /// Wait for one message and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.next_message().await {
            Some(message) => {
                self.handle(message);
                true
            }
            None => false,
        }
    }

    /// Apply every message already queued without waiting.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let message = match self.messages_rx.try_recv() {
                Ok(message) => message,
                Err(_) => match self.signals_rx.try_recv() {
                    Ok(signal) => WorkbenchMessage::Dictation(signal),
                    Err(_) => break,
                },
            };
            self.handle(message);
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, message: WorkbenchMessage) {
        match message {
            WorkbenchMessage::Assistant {
                operation,
                token,
                result,
            } => self.on_assistant_result(operation, token, result),
            WorkbenchMessage::Dictation(signal) => self.on_dictation(signal),
        }
    }

    fn on_assistant_result(
        &mut self,
        operation: AssistantOperation,
        token: u64,
        result: Result<AssistantOutput, String>,
    ) {
        let current = self
            .in_flight
            .get(&operation)
            .is_some_and(|flight| flight.token == token);
        if !current {
            debug!(%operation, token, "Dropping stale assistant result");
            return;
        }
        let Some(flight) = self.in_flight.remove(&operation) else {
            return;
        };

        match operation {
            AssistantOperation::GrammarCheck => self.complete_analysis(flight.ticket, result),
            _ => self.complete_assisted_edit(operation, result),
        }
    }

    fn complete_analysis(&mut self, ticket: Option<u64>, result: Result<AssistantOutput, String>) {
        let Some(ticket) = ticket else {
            return;
        };
        let result = result.and_then(|output| match output {
            AssistantOutput::Feedback(feedback) => Ok(feedback),
            AssistantOutput::Text(_) => Err(AssistantOperation::GrammarCheck
                .failure_message()
                .to_string()),
        });
        if !self.session.apply_analysis(ticket, result) {
            return;
        }

        let now = self.clock.now();
        let event = match (self.session.feedback(), self.session.error()) {
            (Some(feedback), _) => DomainEvent::AnalysisCompleted {
                epoch: self.session.epoch(),
                score: feedback.score,
                error_count: feedback.errors.len(),
                timestamp: now,
            },
            (None, Some(message)) => DomainEvent::AssistantFailed {
                operation: AssistantOperation::GrammarCheck,
                message: message.to_string(),
                timestamp: now,
            },
            (None, None) => return,
        };
        self.emit(event);
    }

    fn complete_assisted_edit(
        &mut self,
        operation: AssistantOperation,
        result: Result<AssistantOutput, String>,
    ) {
        let now = self.clock.now();
        let before = self.session.status();
        match result {
            Ok(output) => {
                let text = match output {
                    AssistantOutput::Text(text) => text,
                    AssistantOutput::Feedback(feedback) => feedback.corrected_text,
                };
                if text.trim().is_empty() {
                    warn!(%operation, "Assistant returned no text; buffer kept");
                    return;
                }
                if self.session.apply_assisted(&text, now) == InputOutcome::Ignored {
                    warn!(%operation, "Assisted edit arrived after input closed");
                    return;
                }
                self.push_checkpoint();
                self.emit_status_change(before);
                self.emit(DomainEvent::AssistedEditApplied {
                    operation,
                    text_length: text.chars().count(),
                    timestamp: now,
                });
            }
            Err(message) => {
                if operation == AssistantOperation::Translation {
                    self.session.restore_checkpoint(now);
                    self.emit_status_change(before);
                }
                self.session.set_error(message.clone());
                self.emit(DomainEvent::AssistantFailed {
                    operation,
                    message,
                    timestamp: now,
                });
            }
        }
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn spawn<F>(&mut self, operation: AssistantOperation, ticket: Option<u64>, task: F)
    where
        F: Future<Output = Result<AssistantOutput, String>> + Send + 'static,
    {
        self.next_token += 1;
        let token = self.next_token;
        let tx = self.messages_tx.clone();
        let handle = tokio::spawn(async move {
            let result = task.await;
            let _ = tx.send(WorkbenchMessage::Assistant {
                operation,
                token,
                result,
            });
        });
        debug!(%operation, token, "Assistant call started");
        if let Some(previous) = self.in_flight.insert(
            operation,
            InFlight {
                token,
                ticket,
                handle,
            },
        ) {
            previous.handle.abort();
        }
    }

    fn abort(&mut self, operation: AssistantOperation) {
        if let Some(flight) = self.in_flight.remove(&operation) {
            debug!(%operation, token = flight.token, "Aborting in-flight call");
            flight.handle.abort();
        }
    }

    fn emit_status_change(&self, before: SessionStatus) {
        let after = self.session.status();
        if before != after {
            self.emit(DomainEvent::StatusChanged {
                epoch: self.session.epoch(),
                from: before,
                to: after,
                timestamp: self.clock.now(),
            });
        }
    }

    fn emit(&self, event: DomainEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Drop for Workbench {
    fn drop(&mut self) {
        for flight in self.in_flight.values() {
            flight.handle.abort();
        }
    }
}

/// Log the raw failure and return the message shown to the user.
fn failure(operation: AssistantOperation, err: AssistantError) -> String {
    let err = err.during(operation);
    warn!(error = %err, "Assistant call failed");
    err.user_message()
}
