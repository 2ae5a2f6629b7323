//! Scripted in-memory assistant.
//!
//! Answers are queued per operation and popped in order. When a queue is
//! empty a deterministic default is returned: a perfect score echoing the
//! text, an unchanged translation, Turkish as the detected language and the
//! prompt unchanged. An optional delay simulates network latency.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use yazim_core::types::{GrammarFeedback, Language, ModelTier};

use crate::error::AssistantError;
use crate::{EnhanceRequest, GrammarRequest, TranslationDirection, WritingAssistant};

/// A recorded call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCall {
    CheckGrammar(String),
    Translate(String, TranslationDirection),
    DetectLanguage(String),
    EnhancePrompt(String),
}

type Queue<T> = Mutex<VecDeque<Result<T, AssistantError>>>;

#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    grammar: Queue<GrammarFeedback>,
    translations: Queue<String>,
    languages: Queue<Language>,
    enhancements: Queue<String>,
    delay: Duration,
    calls: Mutex<Vec<AssistantCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_grammar(&self, result: Result<GrammarFeedback, AssistantError>) {
        lock(&self.grammar).push_back(result);
    }

    pub fn push_translation(&self, result: Result<String, AssistantError>) {
        lock(&self.translations).push_back(result);
    }

    pub fn push_language(&self, result: Result<Language, AssistantError>) {
        lock(&self.languages).push_back(result);
    }

    pub fn push_enhancement(&self, result: Result<String, AssistantError>) {
        lock(&self.enhancements).push_back(result);
    }

    pub fn calls(&self) -> Vec<AssistantCall> {
        lock(&self.calls).clone()
    }

    async fn record(&self, call: AssistantCall) {
        lock(&self.calls).push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl WritingAssistant for ScriptedAssistant {
    async fn check_grammar(
        &self,
        request: &GrammarRequest,
    ) -> Result<GrammarFeedback, AssistantError> {
        self.record(AssistantCall::CheckGrammar(request.text.clone()))
            .await;
        let scripted = lock(&self.grammar).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(GrammarFeedback {
                score: 100,
                errors: Vec::new(),
                summary: "Hata bulunamadı.".to_string(),
                corrected_text: request.text.clone(),
            })
        })
    }

    async fn translate(
        &self,
        text: &str,
        direction: TranslationDirection,
        _tier: ModelTier,
    ) -> Result<String, AssistantError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        self.record(AssistantCall::Translate(text.to_string(), direction))
            .await;
        let scripted = lock(&self.translations).pop_front();
        scripted.unwrap_or_else(|| Ok(text.to_string()))
    }

    async fn detect_language(
        &self,
        text: &str,
        _tier: ModelTier,
    ) -> Result<Language, AssistantError> {
        if text.trim().is_empty() {
            return Ok(Language::Unknown);
        }
        self.record(AssistantCall::DetectLanguage(text.to_string()))
            .await;
        let scripted = lock(&self.languages).pop_front();
        scripted.unwrap_or(Ok(Language::Tr))
    }

    async fn enhance_prompt(&self, request: &EnhanceRequest) -> Result<String, AssistantError> {
        if request.text.trim().is_empty() {
            return Ok(String::new());
        }
        self.record(AssistantCall::EnhancePrompt(request.text.clone()))
            .await;
        let scripted = lock(&self.enhancements).pop_front();
        scripted.unwrap_or_else(|| Ok(request.text.clone()))
    }
}
