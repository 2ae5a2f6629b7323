//! One-shot subcommands: check, translate, enhance and settings.

use std::io::Read;
use std::path::Path;

use yazim_assistant::{EnhanceRequest, GrammarRequest, TranslationDirection, WritingAssistant};
use yazim_core::error::YazimError;
use yazim_core::settings::Settings;
use yazim_core::types::{AssistantOperation, EnhancementLevel, GroundingDocument};

use crate::cli::SettingsAction;
use crate::render;

/// Read a file, or standard input for `-`.
pub fn read_input(input: &str) -> Result<String, YazimError> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Analyse `text` and return the printable report.
pub async fn check(
    assistant: &dyn WritingAssistant,
    settings: &Settings,
    text: &str,
) -> Result<String, YazimError> {
    if text.trim().is_empty() {
        return Err(YazimError::Config("Nothing to check: the input is empty".to_string()));
    }
    let request = GrammarRequest::new(text, settings);
    let feedback = assistant
        .check_grammar(&request)
        .await
        .map_err(|e| e.during(AssistantOperation::GrammarCheck))?;
    tracing::info!(
        score = feedback.score,
        errors = feedback.errors.len(),
        "Check complete"
    );
    Ok(render::feedback_report(text, &feedback, None))
}

/// Detect the language of `text` and translate it the other way.
pub async fn translate(
    assistant: &dyn WritingAssistant,
    settings: &Settings,
    text: &str,
) -> Result<String, YazimError> {
    let tier = settings.model_tier;
    let language = assistant
        .detect_language(text, tier)
        .await
        .map_err(|e| e.during(AssistantOperation::LanguageDetection))?;
    let direction = TranslationDirection::for_source(language);
    tracing::debug!(?language, ?direction, "Translating");
    assistant
        .translate(text, direction, tier)
        .await
        .map_err(|e| e.during(AssistantOperation::Translation))
}

/// Enhance `text` as a prompt. `level` and `force_context` override the
/// saved settings for this call only.
pub async fn enhance(
    assistant: &dyn WritingAssistant,
    settings: &Settings,
    text: &str,
    level: Option<i32>,
    force_context: bool,
) -> Result<String, YazimError> {
    let mut request = EnhanceRequest::new(text, settings);
    if let Some(level) = level {
        request.level = EnhancementLevel::new(level);
    }
    request.force_role_context |= force_context;
    assistant
        .enhance_prompt(&request)
        .await
        .map_err(|e| e.during(AssistantOperation::PromptEnhancement))
}

/// Apply a settings action in place.
///
/// Returns the message to print and whether `settings` changed.
pub fn apply_settings_action(
    settings: &mut Settings,
    action: &SettingsAction,
) -> Result<(String, bool), YazimError> {
    match action {
        SettingsAction::Show => Ok((render::settings_report(settings), false)),
        SettingsAction::Context { text } => {
            settings.context = text.join(" ");
            let message = if settings.context().is_some() {
                "Bağlam kaydedildi."
            } else {
                "Bağlam temizlendi."
            };
            Ok((message.to_string(), true))
        }
        SettingsAction::AddDoc { path } => {
            let document = load_document(path)?;
            let message = format!(
                "Döküman eklendi: {} ({} karakter)",
                document.name,
                document.content.chars().count()
            );
            settings.upsert_document(document);
            Ok((message, true))
        }
        SettingsAction::RemoveDoc { number } => {
            let removed = number
                .checked_sub(1)
                .and_then(|index| settings.remove_document(index))
                .ok_or_else(|| YazimError::Config(format!("No document numbered {}", number)))?;
            Ok((format!("Döküman silindi: {}", removed.name), true))
        }
        SettingsAction::Model { tier } => {
            settings.model_tier = *tier;
            Ok((format!("Model: {}", tier), true))
        }
        SettingsAction::Dictation {
            timeout,
            auto_correct,
            persistent,
        } => {
            if let Some(timeout) = timeout {
                settings.dictation_timeout_secs = *timeout;
            }
            if let Some(auto_correct) = auto_correct {
                settings.default_auto_correct = *auto_correct;
            }
            if let Some(persistent) = persistent {
                settings.default_persistent_dictation = *persistent;
            }
            Ok((render::settings_report(settings), true))
        }
        SettingsAction::Prompt {
            level,
            force_context,
        } => {
            if let Some(level) = level {
                settings.enhancement_level = EnhancementLevel::new(*level);
            }
            if let Some(force_context) = force_context {
                settings.force_role_context = *force_context;
            }
            Ok((render::settings_report(settings), true))
        }
    }
}

/// Read a UTF-8 text file as a grounding document named after the file.
pub fn load_document(path: &Path) -> Result<GroundingDocument, YazimError> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(GroundingDocument { name, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use yazim_assistant::{AssistantCall, AssistantError, ScriptedAssistant};
    use yazim_core::types::{GrammarFeedback, Language, ModelTier};

    #[tokio::test]
    async fn test_check_renders_report() {
        let assistant = ScriptedAssistant::new();
        assistant.push_grammar(Ok(GrammarFeedback {
            score: 75,
            errors: Vec::new(),
            summary: "Virgül eksik.".to_string(),
            corrected_text: "Evet, geldim.".to_string(),
        }));

        let report = check(&assistant, &Settings::default(), "Evet geldim.")
            .await
            .unwrap();
        assert!(report.starts_with("Puan: 75/100"));
        assert!(report.contains("Evet, geldim."));
    }

    #[tokio::test]
    async fn test_check_rejects_empty_input() {
        let assistant = ScriptedAssistant::new();
        let result = check(&assistant, &Settings::default(), "  \n").await;
        assert!(matches!(result, Err(YazimError::Config(_))));
        assert!(assistant.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_failure_has_localized_message() {
        let assistant = ScriptedAssistant::new();
        assistant.push_grammar(Err(AssistantError::EmptyResponse));

        let err = check(&assistant, &Settings::default(), "metin")
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Dil bilgisi kontrolü sırasında bir hata oluştu. Lütfen tekrar deneyin."
        );
    }

    #[tokio::test]
    async fn test_translate_turkish_goes_to_english() {
        let assistant = ScriptedAssistant::new();
        assistant.push_language(Ok(Language::Tr));
        assistant.push_translation(Ok("Good morning".to_string()));

        let out = translate(&assistant, &Settings::default(), "Günaydın")
            .await
            .unwrap();
        assert_eq!(out, "Good morning");
        assert_eq!(
            assistant.calls()[1],
            AssistantCall::Translate(
                "Günaydın".to_string(),
                TranslationDirection::TurkishToEnglish
            )
        );
    }

    #[tokio::test]
    async fn test_enhance_uses_override() {
        let assistant = ScriptedAssistant::new();
        let out = enhance(&assistant, &Settings::default(), "özetle", Some(25), true)
            .await
            .unwrap();
        assert_eq!(out, "özetle");
        assert_eq!(
            assistant.calls(),
            vec![AssistantCall::EnhancePrompt("özetle".to_string())]
        );
    }

    #[test]
    fn test_context_set_and_clear() {
        let mut settings = Settings::default();
        let action = SettingsAction::Context {
            text: vec!["Avukatım,".to_string(), "resmi yazarım.".to_string()],
        };
        let (message, changed) = apply_settings_action(&mut settings, &action).unwrap();
        assert!(changed);
        assert_eq!(message, "Bağlam kaydedildi.");
        assert_eq!(settings.context, "Avukatım, resmi yazarım.");

        let (message, _) =
            apply_settings_action(&mut settings, &SettingsAction::Context { text: vec![] })
                .unwrap();
        assert_eq!(message, "Bağlam temizlendi.");
        assert_eq!(settings.context(), None);
    }

    #[test]
    fn test_add_and_remove_document() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("Kurumsal yazım kuralları".as_bytes()).unwrap();

        let mut settings = Settings::default();
        let action = SettingsAction::AddDoc {
            path: file.path().to_path_buf(),
        };
        apply_settings_action(&mut settings, &action).unwrap();
        // Adding the same file again replaces it.
        apply_settings_action(&mut settings, &action).unwrap();
        assert_eq!(settings.documents.len(), 1);
        assert_eq!(settings.documents[0].content, "Kurumsal yazım kuralları");

        let (message, changed) =
            apply_settings_action(&mut settings, &SettingsAction::RemoveDoc { number: 1 })
                .unwrap();
        assert!(changed);
        assert!(message.starts_with("Döküman silindi"));
        assert!(settings.documents.is_empty());
    }

    #[test]
    fn test_remove_missing_document_errors() {
        let mut settings = Settings::default();
        for number in [0, 1] {
            let result =
                apply_settings_action(&mut settings, &SettingsAction::RemoveDoc { number });
            assert!(matches!(result, Err(YazimError::Config(_))));
        }
    }

    #[test]
    fn test_add_missing_file_is_io_error() {
        let mut settings = Settings::default();
        let action = SettingsAction::AddDoc {
            path: "/nonexistent/yazim/kurallar.txt".into(),
        };
        assert!(matches!(
            apply_settings_action(&mut settings, &action),
            Err(YazimError::Io(_))
        ));
    }

    #[test]
    fn test_model_dictation_and_prompt_actions() {
        let mut settings = Settings::default();
        apply_settings_action(
            &mut settings,
            &SettingsAction::Model {
                tier: ModelTier::Pro,
            },
        )
        .unwrap();
        apply_settings_action(
            &mut settings,
            &SettingsAction::Dictation {
                timeout: Some(0),
                auto_correct: None,
                persistent: Some(true),
            },
        )
        .unwrap();
        apply_settings_action(
            &mut settings,
            &SettingsAction::Prompt {
                level: Some(99),
                force_context: Some(true),
            },
        )
        .unwrap();

        assert_eq!(settings.model_tier, ModelTier::Pro);
        assert_eq!(settings.dictation_timeout_secs, 0);
        assert!(!settings.default_auto_correct);
        assert!(settings.default_persistent_dictation);
        assert_eq!(settings.enhancement_level.value(), EnhancementLevel::MAX);
        assert!(settings.force_role_context);
    }

    #[test]
    fn test_show_does_not_change_settings() {
        let mut settings = Settings::default();
        let (report, changed) =
            apply_settings_action(&mut settings, &SettingsAction::Show).unwrap();
        assert!(!changed);
        assert!(report.contains("Model: flash"));
    }
}
