//! Linear undo/redo history over the text buffer.
//!
//! The history is a list of snapshots plus a pointer. Index 0 is always the
//! initial empty snapshot. Pushing after an undo drops the redo branch.
//! Checkpoints are only taken around AI-assisted edits and at the end of
//! dictation, never per keystroke, so growth is bounded by the number of
//! discrete operations in a session.

/// Snapshot stack with a movable cursor.
///
/// Invariant: `index < stack.len()` and `stack` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
    stack: Vec<String>,
    index: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// A fresh history holding only the empty snapshot.
    pub fn new() -> Self {
        Self {
            stack: vec![String::new()],
            index: 0,
        }
    }

    /// Record `text` as a new checkpoint.
    ///
    /// No-op when `text` equals the active snapshot. Otherwise every snapshot
    /// after the cursor is discarded, `text` is appended and the cursor moves
    /// onto it. Returns whether the history changed.
    pub fn push(&mut self, text: &str) -> bool {
        if self.stack[self.index] == text {
            return false;
        }
        self.stack.truncate(self.index + 1);
        self.stack.push(text.to_string());
        self.index = self.stack.len() - 1;
        tracing::debug!(index = self.index, len = self.stack.len(), "Checkpoint pushed");
        true
    }

    /// Step back one snapshot and return it, or `None` at the start.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.stack[self.index])
    }

    /// Step forward one snapshot and return it, or `None` at the end.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.stack[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.stack.len() - 1
    }

    /// The active snapshot.
    pub fn current(&self) -> &str {
        &self.stack[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Always false; the initial snapshot can't be removed.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Back to `{[""], 0}`.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(String::new());
        self.index = 0;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history() {
        let history = EditHistory::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert_eq!(history.current(), "");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_then_undo_then_redo() {
        let mut history = EditHistory::new();
        history.push("Merhaba");
        history.push("Merhaba dünya");

        assert_eq!(history.undo(), Some("Merhaba"));
        assert_eq!(history.redo(), Some("Merhaba dünya"));
        assert_eq!(history.current(), "Merhaba dünya");
    }

    #[test]
    fn test_can_undo_iff_pushed_since_reset() {
        let mut history = EditHistory::new();
        assert!(!history.can_undo());

        history.push("a");
        assert!(history.can_undo());

        history.reset();
        assert!(!history.can_undo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_push_duplicate_is_noop() {
        let mut history = EditHistory::new();
        assert!(history.push("aynı"));
        assert!(!history.push("aynı"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_push_empty_on_fresh_history_is_noop() {
        let mut history = EditHistory::new();
        assert!(!history.push(""));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = EditHistory::new();
        history.push("bir");
        history.push("iki");
        history.push("üç");

        history.undo();
        history.undo();
        assert_eq!(history.current(), "bir");

        assert!(history.push("dört"));
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), "dört");
    }

    #[test]
    fn test_push_equal_to_rolled_back_snapshot_keeps_branch() {
        let mut history = EditHistory::new();
        history.push("bir");
        history.push("iki");
        history.undo();

        assert!(!history.push("bir"));
        assert!(history.can_redo());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = EditHistory::new();
        assert_eq!(history.undo(), None);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_redo_at_end_is_noop() {
        let mut history = EditHistory::new();
        history.push("x");
        assert_eq!(history.redo(), None);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_undo_to_initial_empty_snapshot() {
        let mut history = EditHistory::new();
        history.push("metin");
        assert_eq!(history.undo(), Some(""));
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }
}
