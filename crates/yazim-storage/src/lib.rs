//! Yazım Storage crate - SQLite persistence for user settings.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! `SettingsRepository` interface (`load`/`save`) with SQLite and in-memory
//! implementations. Every settings field lives under its own key as JSON.

pub mod db;
pub mod migrations;
pub mod settings;

pub use db::Database;
pub use settings::{keys, MemorySettingsRepository, SettingsRepository, SqliteSettingsRepository};
