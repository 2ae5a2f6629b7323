//! `WritingAssistant` over the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use yazim_core::config::AssistantConfig;
use yazim_core::types::{GrammarFeedback, Language, ModelTier};

use crate::error::AssistantError;
use crate::prompts;
use crate::schema::grammar_feedback_schema;
use crate::{EnhanceRequest, GrammarRequest, TranslationDirection, WritingAssistant};

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    flash_model: String,
    pro_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("flash_model", &self.flash_model)
            .field("pro_model", &self.pro_model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            flash_model: config.flash_model.clone(),
            pro_model: config.pro_model.clone(),
        })
    }

    /// Read the API key from the environment variable named in `config`.
    pub fn from_env(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AssistantError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(api_key, config)
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Flash => &self.flash_model,
            ModelTier::Pro => &self.pro_model,
        }
    }

    async fn generate(
        &self,
        tier: ModelTier,
        body: &GenerateContentRequest,
    ) -> Result<String, AssistantError> {
        let model = self.model_for(tier);
        let url = format!("{}/{}:generateContent", self.base_url, model);
        tracing::debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text_response(parsed)
    }
}

#[async_trait]
impl WritingAssistant for GeminiClient {
    async fn check_grammar(
        &self,
        request: &GrammarRequest,
    ) -> Result<GrammarFeedback, AssistantError> {
        let body = grammar_request_body(request);
        let text = self.generate(request.tier, &body).await?;
        let feedback = parse_feedback(&text)?;
        tracing::info!(
            score = feedback.score,
            errors = feedback.errors.len(),
            "Grammar check completed"
        );
        Ok(feedback)
    }

    async fn translate(
        &self,
        text: &str,
        direction: TranslationDirection,
        tier: ModelTier,
    ) -> Result<String, AssistantError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let body = translation_request_body(text, direction, tier);
        Ok(self.generate(tier, &body).await?.trim().to_string())
    }

    async fn detect_language(
        &self,
        text: &str,
        tier: ModelTier,
    ) -> Result<Language, AssistantError> {
        if text.trim().is_empty() {
            return Ok(Language::Unknown);
        }
        let body = detection_request_body(text, tier);
        let answer = self.generate(tier, &body).await?;
        Ok(Language::from_tag(&answer))
    }

    async fn enhance_prompt(&self, request: &EnhanceRequest) -> Result<String, AssistantError> {
        if request.text.trim().is_empty() {
            return Ok(String::new());
        }
        let body = enhancement_request_body(request);
        Ok(self.generate(request.tier, &body).await?.trim().to_string())
    }
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text }],
        }
    }

    fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

/// The fast tier runs without extended reasoning; the quality tier keeps the
/// model default.
fn thinking_config(tier: ModelTier) -> Option<ThinkingConfig> {
    match tier {
        ModelTier::Flash => Some(ThinkingConfig { thinking_budget: 0 }),
        ModelTier::Pro => None,
    }
}

fn grammar_request_body(request: &GrammarRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::grammar_user_prompt(&request.text))],
        system_instruction: Some(Content::system(prompts::grammar_system_instruction(
            request.context.as_deref(),
            &request.documents,
        ))),
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(grammar_feedback_schema()),
            thinking_config: thinking_config(request.tier),
            ..GenerationConfig::default()
        },
    }
}

fn translation_request_body(
    text: &str,
    direction: TranslationDirection,
    tier: ModelTier,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::translation_user_prompt(text, direction))],
        system_instruction: Some(Content::system(
            prompts::translation_system_instruction(direction).to_string(),
        )),
        generation_config: GenerationConfig {
            temperature: Some(prompts::TRANSLATION_TEMPERATURE),
            thinking_config: thinking_config(tier),
            ..GenerationConfig::default()
        },
    }
}

fn detection_request_body(text: &str, tier: ModelTier) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::language_detection_prompt(text))],
        system_instruction: None,
        generation_config: GenerationConfig {
            temperature: Some(prompts::DETECTION_TEMPERATURE),
            thinking_config: thinking_config(tier),
            ..GenerationConfig::default()
        },
    }
}

fn enhancement_request_body(request: &EnhanceRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::enhancement_user_prompt(&request.text))],
        system_instruction: Some(Content::system(prompts::enhancement_system_instruction(
            request.level,
            request.force_role_context,
        ))),
        generation_config: GenerationConfig {
            temperature: Some(prompts::enhancement_temperature(request.tier)),
            thinking_config: thinking_config(request.tier),
            ..GenerationConfig::default()
        },
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, AssistantError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> AssistantError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    AssistantError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Parse the JSON grammar feedback, tolerating a Markdown code fence.
pub fn parse_feedback(raw: &str) -> Result<GrammarFeedback, AssistantError> {
    let trimmed = raw.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(json.trim())?)
}
