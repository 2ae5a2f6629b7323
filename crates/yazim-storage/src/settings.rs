//! Settings persistence.
//!
//! `SettingsRepository` is the seam between the workbench and wherever the
//! user settings live. The SQLite implementation stores each field under its
//! own key as a JSON value; a key that is missing or fails to parse falls
//! back to the field default without affecting the other fields.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::OptionalExtension;
use serde::de::DeserializeOwned;
use serde::Serialize;

use yazim_core::error::YazimError;
use yazim_core::settings::Settings;

use crate::db::Database;

/// Storage keys, one per settings field.
pub mod keys {
    pub const CONTEXT: &str = "yazim.context";
    pub const DOCUMENTS: &str = "yazim.groundingDocuments";
    pub const DEFAULT_AUTO_CORRECT: &str = "yazim.defaultAutoCorrect";
    pub const DEFAULT_PERSISTENT_DICTATION: &str = "yazim.defaultPersistentDictation";
    pub const DICTATION_TIMEOUT: &str = "yazim.dictationTimeout";
    pub const ENHANCEMENT_LEVEL: &str = "yazim.enhancementLevel";
    pub const FORCE_ROLE_CONTEXT: &str = "yazim.forceRoleContext";
    pub const MODEL_PREFERENCE: &str = "yazim.aiModelPreference";
}

/// Load and save user settings.
pub trait SettingsRepository: Send + Sync {
    fn load(&self) -> Result<Settings, YazimError>;
    fn save(&self, settings: &Settings) -> Result<(), YazimError>;
}

/// SQLite-backed settings store.
pub struct SqliteSettingsRepository {
    db: Arc<Database>,
}

impl SqliteSettingsRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>, YazimError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM settings WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| YazimError::Storage(format!("Failed to read setting {}: {}", key, e)))
        })
    }

    /// Read one key, falling back to `default` when missing or unparsable.
    fn read_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, YazimError> {
        let Some(raw) = self.read_raw(key)? else {
            return Ok(default);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable setting");
                Ok(default)
            }
        }
    }
}

fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<(&'static str, String), YazimError> {
    Ok((key, serde_json::to_string(value)?))
}

impl SettingsRepository for SqliteSettingsRepository {
    fn load(&self) -> Result<Settings, YazimError> {
        let defaults = Settings::default();
        Ok(Settings {
            context: self.read_or(keys::CONTEXT, defaults.context)?,
            documents: self.read_or(keys::DOCUMENTS, defaults.documents)?,
            default_auto_correct: self
                .read_or(keys::DEFAULT_AUTO_CORRECT, defaults.default_auto_correct)?,
            default_persistent_dictation: self.read_or(
                keys::DEFAULT_PERSISTENT_DICTATION,
                defaults.default_persistent_dictation,
            )?,
            dictation_timeout_secs: self
                .read_or(keys::DICTATION_TIMEOUT, defaults.dictation_timeout_secs)?,
            enhancement_level: self.read_or(keys::ENHANCEMENT_LEVEL, defaults.enhancement_level)?,
            force_role_context: self
                .read_or(keys::FORCE_ROLE_CONTEXT, defaults.force_role_context)?,
            model_tier: self.read_or(keys::MODEL_PREFERENCE, defaults.model_tier)?,
        })
    }

    /// Writes every key in one transaction.
    fn save(&self, settings: &Settings) -> Result<(), YazimError> {
        let entries = [
            encode(keys::CONTEXT, &settings.context)?,
            encode(keys::DOCUMENTS, &settings.documents)?,
            encode(keys::DEFAULT_AUTO_CORRECT, &settings.default_auto_correct)?,
            encode(
                keys::DEFAULT_PERSISTENT_DICTATION,
                &settings.default_persistent_dictation,
            )?,
            encode(keys::DICTATION_TIMEOUT, &settings.dictation_timeout_secs)?,
            encode(keys::ENHANCEMENT_LEVEL, &settings.enhancement_level)?,
            encode(keys::FORCE_ROLE_CONTEXT, &settings.force_role_context)?,
            encode(keys::MODEL_PREFERENCE, &settings.model_tier)?,
        ];
        let now = Utc::now().timestamp();

        self.db.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| YazimError::Storage(format!("Failed to begin transaction: {}", e)))?;
            for (key, value) in &entries {
                tx.execute(
                    "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                    updated_at = excluded.updated_at",
                    rusqlite::params![key, value, now],
                )
                .map_err(|e| YazimError::Storage(format!("Failed to save setting {}: {}", key, e)))?;
            }
            tx.commit()
                .map_err(|e| YazimError::Storage(format!("Failed to commit settings: {}", e)))
        })?;

        tracing::debug!(documents = settings.documents.len(), "Settings saved");
        Ok(())
    }
}

/// Settings held in memory only.
#[derive(Debug, Default)]
pub struct MemorySettingsRepository {
    settings: Mutex<Settings>,
    saves: Mutex<usize>,
}

impl MemorySettingsRepository {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SettingsRepository for MemorySettingsRepository {
    fn load(&self) -> Result<Settings, YazimError> {
        Ok(self
            .settings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), YazimError> {
        *self.settings.lock().unwrap_or_else(|e| e.into_inner()) = settings.clone();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
