use yazim_core::types::{
    AssistantOperation, GrammarFeedback, ModelTier, SessionStatus, TypingStats,
};
use yazim_dictation::DictationState;

/// Read-only view of the workbench for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchSnapshot {
    pub epoch: u64,
    pub status: SessionStatus,
    pub buffer: String,
    pub elapsed_secs: f64,
    pub stats: Option<TypingStats>,
    pub submitted_text: Option<String>,
    pub feedback: Option<GrammarFeedback>,
    pub error: Option<String>,
    /// Analysis was requested and has not answered yet.
    pub loading: bool,
    pub busy: Vec<AssistantOperation>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub dictation: DictationState,
    pub auto_correct: bool,
    pub persistent_dictation: bool,
    pub model_tier: ModelTier,
}

impl WorkbenchSnapshot {
    pub fn is_busy(&self, operation: AssistantOperation) -> bool {
        self.busy.contains(&operation)
    }
}
