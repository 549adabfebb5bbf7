//! Gemini backend
//!
//! Talks to the `generateContent` REST API. Stateless: conversation history
//! arrives in every request, already assembled by the caller.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use agrobot_config::LlmSettings;
use agrobot_core::{
    FinishReason, GenerateRequest, GenerateResponse, LanguageModel, Message, Role, TokenUsage,
};

use crate::LlmError;

/// Gemini configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model name/ID
    pub model: String,
    /// API base URL
    pub endpoint: String,
    /// API key
    pub api_key: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature
    pub temperature: f32,
    /// Top-p sampling
    pub top_p: f32,
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.95,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl GeminiConfig {
    pub fn from_settings(settings: &LlmSettings, timeout: Duration) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
            timeout,
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
        }
    }
}

/// Gemini API backend
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }

    fn build_request(&self, request: &GenerateRequest) -> GeminiRequest {
        GeminiRequest {
            contents: request.messages.iter().map(GeminiContent::from).collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                top_p: self.config.top_p,
            },
        }
    }

    async fn execute_request(
        &self,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<GeminiResponse, LlmError> {
        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {}: {}", status, error)));
            }
            return Err(LlmError::Api(error));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(error, LlmError::Network(_) | LlmError::Timeout)
    }

    /// Generate with retry and exponential backoff
    pub async fn complete(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            LlmError::Configuration("GOOGLE_API_KEY is missing. Add it to your environment.".to_string())
        })?;

        let body = self.build_request(request);
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "Gemini request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(api_key, &body).await {
                Ok(result) => return result.into_generate_response(),
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl LanguageModel for GeminiBackend {
    async fn generate(&self, request: GenerateRequest) -> agrobot_core::Result<GenerateResponse> {
        let start = std::time::Instant::now();
        let response = self.complete(&request).await?;
        tracing::debug!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            finish_reason = ?response.finish_reason,
            "Gemini generation complete"
        );
        Ok(response)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl From<&Message> for GeminiContent {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        let mut parts = vec![GeminiPart::text(message.content.clone())];
        if let Some(image) = &message.image {
            parts.push(GeminiPart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.format.mime_type().to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(&image.data),
                }),
            });
        }
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl GeminiPart {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiResponse {
    fn into_generate_response(self) -> Result<GenerateResponse, LlmError> {
        let usage = self
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count));

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(LlmError::InvalidResponse(format!(
                "Model returned no answer ({})",
                reason
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let finish_reason = match candidate.finish_reason.as_deref() {
            None | Some("STOP") => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::ContentFilter
            }
            Some(_) => FinishReason::Other,
        };

        Ok(GenerateResponse {
            text,
            finish_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrobot_core::{Error, ImageFormat, ImageInput, Service};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> GeminiConfig {
        GeminiConfig {
            endpoint: server.uri(),
            api_key: Some("test-key".to_string()),
            initial_backoff: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn answer(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
        })
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Sow wheat in November.")))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(config_for(&server)).unwrap();
        let request = GenerateRequest::new()
            .with_user_message("When to sow wheat?")
            .with_assistant_message("Which region?")
            .with_user_message("Punjab");
        let response = backend.generate(request).await.unwrap();

        assert_eq!(response.text, "Sow wheat in November.");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.unwrap().total_tokens, 20);

        let sent: serde_json::Value =
            serde_json::from_slice(&server.received_requests().await.unwrap()[0].body).unwrap();
        let roles: Vec<_> = sent["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("ok")))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(config_for(&server)).unwrap();
        let response = backend
            .generate(GenerateRequest::new().with_user_message("hi"))
            .await
            .unwrap();
        assert_eq!(response.text, "ok");
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(config_for(&server)).unwrap();
        let err = backend
            .generate(GenerateRequest::new().with_user_message("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.service(), Some(Service::LanguageModel));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let backend = GeminiBackend::new(GeminiConfig::default()).unwrap();
        let err = backend
            .generate(GenerateRequest::new().with_user_message("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_image_sent_inline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Tomato, early blight, mild.")))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(config_for(&server)).unwrap();
        let image = ImageInput::new(vec![0xFF, 0xD8, 0xFF, 0xE0], ImageFormat::Jpeg);
        let request = GenerateRequest {
            messages: vec![Message::user_with_image("Analyze this leaf", image)],
        };
        backend.generate(request).await.unwrap();

        let sent: serde_json::Value =
            serde_json::from_slice(&server.received_requests().await.unwrap()[0].body).unwrap();
        let parts = &sent["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Analyze this leaf");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "/9j/4A==");
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(config_for(&server)).unwrap();
        let err = backend
            .complete(&GenerateRequest::new().with_user_message("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(ref m) if m.contains("SAFETY")));
    }
}
