//! User preferences persisted between runs.
//!
//! These are distinct from [`crate::config::YazimConfig`]: the config file
//! describes how the process runs, while `Settings` is what the user edits
//! from inside the tool (context, grounding documents, dictation defaults,
//! prompt enhancement, model tier).

use serde::{Deserialize, Serialize};

use crate::types::{EnhancementLevel, GroundingDocument, ModelTier};

/// Default dictation inactivity timeout in seconds.
pub const DEFAULT_DICTATION_TIMEOUT_SECS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Free-form description of the writer and their personal rules.
    pub context: String,
    /// Reference documents given priority over the default rules.
    pub documents: Vec<GroundingDocument>,
    /// Initial state of the auto-correct toggle for a new run.
    pub default_auto_correct: bool,
    /// Initial state of the persistent-dictation toggle for a new run.
    pub default_persistent_dictation: bool,
    /// Seconds of silence before dictation stops on its own. `0` disables it.
    pub dictation_timeout_secs: u32,
    pub enhancement_level: EnhancementLevel,
    pub force_role_context: bool,
    pub model_tier: ModelTier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            context: String::new(),
            documents: Vec::new(),
            default_auto_correct: false,
            default_persistent_dictation: false,
            dictation_timeout_secs: DEFAULT_DICTATION_TIMEOUT_SECS,
            enhancement_level: EnhancementLevel::default(),
            force_role_context: false,
            model_tier: ModelTier::Flash,
        }
    }
}

impl Settings {
    /// The user context, or `None` when it is blank.
    pub fn context(&self) -> Option<&str> {
        let trimmed = self.context.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(self.context.as_str())
        }
    }

    /// Add a document, replacing an existing one with the same name.
    pub fn upsert_document(&mut self, document: GroundingDocument) {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.name == document.name) {
            *existing = document;
        } else {
            self.documents.push(document);
        }
    }

    /// Remove the document at `index`, returning it if it existed.
    pub fn remove_document(&mut self, index: usize) -> Option<GroundingDocument> {
        if index < self.documents.len() {
            Some(self.documents.remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, content: &str) -> GroundingDocument {
        GroundingDocument {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.context.is_empty());
        assert!(settings.documents.is_empty());
        assert!(!settings.default_auto_correct);
        assert!(!settings.default_persistent_dictation);
        assert_eq!(settings.dictation_timeout_secs, DEFAULT_DICTATION_TIMEOUT_SECS);
        assert!(settings.enhancement_level.is_auto());
        assert_eq!(settings.model_tier, ModelTier::Flash);
    }

    #[test]
    fn test_blank_context_is_none() {
        let mut settings = Settings::default();
        settings.context = "   \n".to_string();
        assert!(settings.context().is_none());
        settings.context = "Adım Can.".to_string();
        assert_eq!(settings.context(), Some("Adım Can."));
    }

    #[test]
    fn test_upsert_document_replaces_by_name() {
        let mut settings = Settings::default();
        settings.upsert_document(doc("kurallar.txt", "v1"));
        settings.upsert_document(doc("sozluk.csv", "a,b"));
        settings.upsert_document(doc("kurallar.txt", "v2"));
        assert_eq!(settings.documents.len(), 2);
        assert_eq!(settings.documents[0].content, "v2");
    }

    #[test]
    fn test_remove_document_out_of_range() {
        let mut settings = Settings::default();
        settings.upsert_document(doc("a.txt", "a"));
        assert!(settings.remove_document(3).is_none());
        assert_eq!(settings.remove_document(0).unwrap().name, "a.txt");
        assert!(settings.documents.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"forceRoleContext": true}"#).unwrap();
        assert!(settings.force_role_context);
        assert_eq!(settings.dictation_timeout_secs, DEFAULT_DICTATION_TIMEOUT_SECS);
    }
}
