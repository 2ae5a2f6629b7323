use yazim_core::types::{AssistantOperation, GrammarFeedback};
use yazim_dictation::DictationSignal;

/// Successful payload of an assistant call.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantOutput {
    Feedback(GrammarFeedback),
    Text(String),
}

/// Completion and recognition messages delivered to the workbench.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbenchMessage {
    /// An assistant task finished. `token` identifies the request; a token
    /// that no longer matches the in-flight entry marks the result stale.
    /// Errors carry the localized message for the user.
    Assistant {
        operation: AssistantOperation,
        token: u64,
        result: Result<AssistantOutput, String>,
    },
    /// A recognizer or dictation timer event.
    Dictation(DictationSignal),
}
