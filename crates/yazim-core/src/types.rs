use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a practice/analysis session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Nothing typed yet; buffer empty and timing reset.
    #[default]
    Waiting,
    /// Actively typing; the clock is running.
    Typing,
    /// Clock stopped by the user; input is ignored.
    Paused,
    /// Statistics computed and analysis requested; input is ignored.
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Waiting => write!(f, "waiting"),
            SessionStatus::Typing => write!(f, "typing"),
            SessionStatus::Paused => write!(f, "paused"),
            SessionStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Response mode of the external AI service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// Low latency, no extended reasoning.
    #[default]
    Flash,
    /// Higher quality, slower.
    Pro,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Flash => write!(f, "flash"),
            ModelTier::Pro => write!(f, "pro"),
        }
    }
}

impl std::str::FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flash" => Ok(ModelTier::Flash),
            "pro" => Ok(ModelTier::Pro),
            other => Err(format!("unknown model tier: {}", other)),
        }
    }
}

/// Language tag returned by language detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Tr,
    En,
    Unknown,
}

impl Language {
    /// Normalise a free-form model answer into one of the known tags.
    pub fn from_tag(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "tr" => Language::Tr,
            "en" => Language::En,
            _ => Language::Unknown,
        }
    }
}

/// Category of a grammar error span.
///
/// The service is prompted with the Turkish tags, so both spellings are
/// accepted on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "spelling", alias = "yazım")]
    Spelling,
    #[serde(rename = "punctuation", alias = "noktalama")]
    Punctuation,
}

/// Operations delegated to the external AI service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantOperation {
    GrammarCheck,
    Translation,
    LanguageDetection,
    PromptEnhancement,
    AutoCorrection,
}

impl AssistantOperation {
    /// Turkish message stored as session error state when the operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            AssistantOperation::GrammarCheck => {
                "Dil bilgisi kontrolü sırasında bir hata oluştu. Lütfen tekrar deneyin."
            }
            AssistantOperation::Translation => "Metin çevrilirken bir hata oluştu.",
            AssistantOperation::LanguageDetection => "Dil algılanırken bir hata oluştu.",
            AssistantOperation::PromptEnhancement => "Prompt geliştirilirken bir hata oluştu.",
            AssistantOperation::AutoCorrection => {
                "Otomatik düzeltme sırasında bir hata oluştu. Lütfen tekrar deneyin."
            }
        }
    }
}

impl fmt::Display for AssistantOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantOperation::GrammarCheck => write!(f, "grammar check"),
            AssistantOperation::Translation => write!(f, "translation"),
            AssistantOperation::LanguageDetection => write!(f, "language detection"),
            AssistantOperation::PromptEnhancement => write!(f, "prompt enhancement"),
            AssistantOperation::AutoCorrection => write!(f, "auto-correction"),
        }
    }
}

// =============================================================================
// Newtype Wrappers
// =============================================================================

/// Prompt enhancement intensity.
///
/// Invariant: always within `MIN..=MAX`. Negative values simplify, zero is
/// automatic, positive values elaborate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct EnhancementLevel(i8);

impl EnhancementLevel {
    pub const MIN: i8 = -20;
    pub const MAX: i8 = 30;

    /// Build a level, clamping out-of-range values.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN as i32, Self::MAX as i32) as i8)
    }

    pub fn value(&self) -> i8 {
        self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for EnhancementLevel {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<EnhancementLevel> for i32 {
    fn from(level: EnhancementLevel) -> Self {
        level.0 as i32
    }
}

impl fmt::Display for EnhancementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// A user-supplied reference text that outranks the default rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingDocument {
    pub name: String,
    pub content: String,
}

/// One error span reported by the grammar check.
///
/// `start_index`/`end_index` are 0-based, end-exclusive character offsets
/// into the exact text that was submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarError {
    pub error_type: ErrorType,
    pub text: String,
    pub start_index: usize,
    pub end_index: usize,
    pub correction: String,
    pub explanation: String,
}

/// Full grammar analysis returned by the external service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarFeedback {
    #[serde(deserialize_with = "clamped_score")]
    pub score: u8,
    #[serde(default)]
    pub errors: Vec<GrammarError>,
    pub summary: String,
    pub corrected_text: String,
}

fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, 100) as u8)
}

/// Statistics computed once when a session finishes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingStats {
    /// Words per minute, rounded to the nearest integer.
    pub wpm: u32,
    /// Elapsed active time in seconds, rounded to 2 decimals.
    pub time_secs: f64,
    pub word_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_default_is_waiting() {
        assert_eq!(SessionStatus::default(), SessionStatus::Waiting);
    }

    #[test]
    fn test_model_tier_parse() {
        assert_eq!("flash".parse::<ModelTier>().unwrap(), ModelTier::Flash);
        assert_eq!(" PRO ".parse::<ModelTier>().unwrap(), ModelTier::Pro);
        assert!("ultra".parse::<ModelTier>().is_err());
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag(" TR\n"), Language::Tr);
        assert_eq!(Language::from_tag("en"), Language::En);
        assert_eq!(Language::from_tag("Türkçe"), Language::Unknown);
    }

    #[test]
    fn test_enhancement_level_clamps() {
        assert_eq!(EnhancementLevel::new(100).value(), 30);
        assert_eq!(EnhancementLevel::new(-100).value(), -20);
        assert_eq!(EnhancementLevel::new(7).value(), 7);
        assert!(EnhancementLevel::default().is_auto());
        assert_eq!(EnhancementLevel::new(5).to_string(), "+5");
        assert_eq!(EnhancementLevel::new(-5).to_string(), "-5");
    }

    #[test]
    fn test_enhancement_level_serde_clamps() {
        let level: EnhancementLevel = serde_json::from_str("45").unwrap();
        assert_eq!(level.value(), 30);
        assert_eq!(serde_json::to_string(&level).unwrap(), "30");
    }

    #[test]
    fn test_feedback_accepts_turkish_error_tags() {
        let json = r#"{
            "score": 82,
            "errors": [
                {"errorType": "yazım", "text": "herkez", "startIndex": 0, "endIndex": 6,
                 "correction": "herkes", "explanation": "Doğrusu 'herkes'."},
                {"errorType": "punctuation", "text": "geldi", "startIndex": 7, "endIndex": 12,
                 "correction": "geldi.", "explanation": "Cümle sonuna nokta konur."}
            ],
            "summary": "İyi iş.",
            "correctedText": "herkes geldi."
        }"#;
        let feedback: GrammarFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.score, 82);
        assert_eq!(feedback.errors.len(), 2);
        assert_eq!(feedback.errors[0].error_type, ErrorType::Spelling);
        assert_eq!(feedback.errors[1].error_type, ErrorType::Punctuation);
        assert_eq!(feedback.errors[0].end_index, 6);
        assert_eq!(feedback.corrected_text, "herkes geldi.");
    }

    #[test]
    fn test_feedback_score_is_clamped() {
        let json = r#"{"score": 140, "summary": "", "correctedText": ""}"#;
        let feedback: GrammarFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.score, 100);
        assert!(feedback.errors.is_empty());

        let json = r#"{"score": -3, "summary": "", "correctedText": ""}"#;
        let feedback: GrammarFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.score, 0);
    }

    #[test]
    fn test_assistant_operation_messages_are_distinct() {
        let ops = [
            AssistantOperation::GrammarCheck,
            AssistantOperation::Translation,
            AssistantOperation::LanguageDetection,
            AssistantOperation::PromptEnhancement,
            AssistantOperation::AutoCorrection,
        ];
        let messages: std::collections::HashSet<_> =
            ops.iter().map(|op| op.failure_message()).collect();
        assert_eq!(messages.len(), ops.len());
    }
}
