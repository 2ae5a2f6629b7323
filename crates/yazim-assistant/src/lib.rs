//! Yazım Assistant crate - the external AI collaborator.
//!
//! Defines the `WritingAssistant` trait consumed by the workbench, the
//! Gemini REST implementation, the prompt text and response schema it sends,
//! and a scripted in-memory assistant for tests and offline runs.

pub mod error;
pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod schema;

use async_trait::async_trait;

use yazim_core::settings::Settings;
use yazim_core::types::{
    EnhancementLevel, GrammarFeedback, GroundingDocument, Language, ModelTier,
};

pub use error::AssistantError;
pub use gemini::GeminiClient;
pub use mock::{AssistantCall, ScriptedAssistant};

/// Which way a translation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationDirection {
    TurkishToEnglish,
    EnglishToTurkish,
}

impl TranslationDirection {
    /// English source text goes to Turkish; anything else goes to English.
    pub fn for_source(language: Language) -> Self {
        match language {
            Language::En => TranslationDirection::EnglishToTurkish,
            Language::Tr | Language::Unknown => TranslationDirection::TurkishToEnglish,
        }
    }
}

/// Everything a grammar check needs, captured at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRequest {
    pub text: String,
    pub context: Option<String>,
    pub documents: Vec<GroundingDocument>,
    pub tier: ModelTier,
}

impl GrammarRequest {
    pub fn new(text: impl Into<String>, settings: &Settings) -> Self {
        Self {
            text: text.into(),
            context: settings.context().map(str::to_string),
            documents: settings.documents.clone(),
            tier: settings.model_tier,
        }
    }
}

/// A prompt enhancement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceRequest {
    pub text: String,
    pub level: EnhancementLevel,
    pub force_role_context: bool,
    pub tier: ModelTier,
}

impl EnhanceRequest {
    pub fn new(text: impl Into<String>, settings: &Settings) -> Self {
        Self {
            text: text.into(),
            level: settings.enhancement_level,
            force_role_context: settings.force_role_context,
            tier: settings.model_tier,
        }
    }
}

/// The external AI collaborator.
///
/// Implementations must return `""` / `Language::Unknown` for blank input
/// without contacting any service.
#[async_trait]
pub trait WritingAssistant: Send + Sync {
    /// Grammar, spelling and punctuation analysis of `request.text`.
    async fn check_grammar(&self, request: &GrammarRequest)
        -> Result<GrammarFeedback, AssistantError>;

    async fn translate(
        &self,
        text: &str,
        direction: TranslationDirection,
        tier: ModelTier,
    ) -> Result<String, AssistantError>;

    async fn detect_language(&self, text: &str, tier: ModelTier)
        -> Result<Language, AssistantError>;

    async fn enhance_prompt(&self, request: &EnhanceRequest) -> Result<String, AssistantError>;
}
