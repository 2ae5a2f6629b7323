//! Yazım Session crate - session lifecycle and edit history.
//!
//! Provides the session state machine (waiting -> typing <-> paused ->
//! finished), the linear undo/redo history shared by manual typing,
//! dictation and AI-assisted edits, statistics computation, and the
//! segmentation used to highlight grammar error spans.

pub mod highlight;
pub mod history;
pub mod session;
pub mod state;
pub mod stats;

pub use highlight::{segments, Segment};
pub use history::EditHistory;
pub use session::{AnalysisTicket, InputOutcome, Session};
pub use stats::{compute_stats, word_count};
