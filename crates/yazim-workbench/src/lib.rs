//! Yazım Workbench crate - the orchestrator behind every front end.
//!
//! The `Workbench` owns the session, the dictation engine and the user
//! settings. Assistant calls and recognizer callbacks run concurrently but
//! never touch that state directly: they post a `WorkbenchMessage` back,
//! and the workbench applies it on its own task.

pub mod message;
pub mod snapshot;
pub mod workbench;

pub use message::{AssistantOutput, WorkbenchMessage};
pub use snapshot::WorkbenchSnapshot;
pub use workbench::{Workbench, WorkbenchOptions};
