//! Google Translate speech backend
//!
//! The `translate_tts` endpoint speaks at most ~100 characters per request,
//! so text is chunked and the returned MP3 segments are concatenated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use agrobot_config::TtsSettings;
use agrobot_core::{Language, SynthesizedAudio, TextToSpeech};

use super::chunker::split_for_speech;
use crate::PipelineError;

/// Google TTS configuration
#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    pub endpoint: String,
    /// Longest chunk per request (grapheme clusters)
    pub max_chunk_chars: usize,
    pub timeout: Duration,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            max_chunk_chars: 100,
            timeout: Duration::from_secs(10),
        }
    }
}

impl GoogleTtsConfig {
    pub fn from_settings(settings: &TtsSettings, timeout: Duration) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            max_chunk_chars: settings.max_chunk_chars,
            timeout,
        }
    }
}

/// MP3 speech from the Google Translate voice endpoint
pub struct GoogleTts {
    client: Client,
    config: GoogleTtsConfig,
}

impl GoogleTts {
    pub fn new(config: GoogleTtsConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (compatible; agrobot)")
            .build()
            .map_err(|e| PipelineError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: Language,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, PipelineError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.code()),
                ("q", chunk),
                ("idx", &idx.to_string()),
                ("total", &total.to_string()),
                ("textlen", &chunk.chars().count().to_string()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Tts(format!("Speech service unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Tts(format!("Speech API error {}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Tts(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Synthesize all chunks in order and join them
    pub async fn speak(&self, text: &str, language: Language) -> Result<SynthesizedAudio, PipelineError> {
        let chunks = split_for_speech(text, self.config.max_chunk_chars);
        if chunks.is_empty() {
            return Err(PipelineError::Tts("Nothing to synthesize".to_string()));
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, language, idx, total).await?);
        }

        if audio.is_empty() {
            return Err(PipelineError::Tts("Speech service returned no audio".to_string()));
        }

        tracing::debug!(language = %language, chunks = total, bytes = audio.len(), "Synthesized speech");
        Ok(SynthesizedAudio::mp3(audio))
    }
}

#[async_trait]
impl TextToSpeech for GoogleTts {
    async fn synthesize(&self, text: &str, language: Language) -> agrobot_core::Result<SynthesizedAudio> {
        Ok(self.speak(text, language).await?)
    }

    fn model_name(&self) -> &str {
        "google-translate-tts"
    }
}
