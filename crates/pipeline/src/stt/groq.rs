//! Whisper transcription over Groq's OpenAI-compatible API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use agrobot_config::SttSettings;
use agrobot_core::{AudioInput, SpeechToText, TranscriptionOptions};

use crate::PipelineError;

/// Groq Whisper configuration
#[derive(Debug, Clone)]
pub struct GroqSttConfig {
    /// API base URL
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for GroqSttConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "whisper-large-v3-turbo".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl GroqSttConfig {
    pub fn from_settings(settings: &SttSettings, timeout: Duration) -> Self {
        Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout,
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Whisper STT backend
pub struct GroqWhisperStt {
    client: Client,
    config: GroqSttConfig,
}

impl GroqWhisperStt {
    pub fn new(config: GroqSttConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.endpoint)
    }

    // Multipart bodies are consumed on send, so each attempt builds its own
    fn build_form(&self, audio: &AudioInput, options: &TranscriptionOptions) -> Result<Form, PipelineError> {
        let file = Part::bytes(audio.data.clone())
            .file_name(audio.file_name())
            .mime_str(audio.format.mime_type())
            .map_err(|e| PipelineError::Stt(format!("Invalid audio mime type: {}", e)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("language", options.language.code())
            .text("response_format", "json");

        if let Some(prompt) = &options.prompt {
            form = form.text("prompt", prompt.clone());
        }
        Ok(form)
    }

    async fn execute_request(
        &self,
        api_key: &str,
        audio: &AudioInput,
        options: &TranscriptionOptions,
    ) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .multipart(self.build_form(audio, options)?)
            .send()
            .await
            .map_err(|e| PipelineError::SttNetwork(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(PipelineError::SttNetwork(format!("Server error {}: {}", status, body)));
            }
            return Err(PipelineError::Stt(format!("Transcription API error {}: {}", status, body)));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Stt(format!("Invalid transcription response: {}", e)))?;
        Ok(parsed.text)
    }

    /// Transcribe with retry and exponential backoff
    pub async fn recognize(
        &self,
        audio: &AudioInput,
        options: &TranscriptionOptions,
    ) -> Result<String, PipelineError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            PipelineError::Configuration("GROQ_API_KEY is missing. Add it to your environment.".to_string())
        })?;

        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "Transcription request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(api_key, audio, options).await {
                Ok(text) => return Ok(text),
                Err(e @ PipelineError::SttNetwork(_)) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| PipelineError::SttNetwork("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl SpeechToText for GroqWhisperStt {
    async fn transcribe(
        &self,
        audio: &AudioInput,
        options: &TranscriptionOptions,
    ) -> agrobot_core::Result<String> {
        let start = std::time::Instant::now();
        let text = self.recognize(audio, options).await?;
        tracing::debug!(
            model = %self.config.model,
            language = %options.language,
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "Transcription complete"
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
