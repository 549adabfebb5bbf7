//! Google Translate backend
//!
//! Uses the public `translate_a/single` endpoint (`client=gtx`), which needs
//! no credentials and answers with a nested JSON array of translated
//! segments.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use agrobot_config::TranslationSettings;
use agrobot_core::{Language, Translator};

use crate::{Result, TextProcessingError};

/// Google translator configuration
#[derive(Debug, Clone)]
pub struct GoogleTranslatorConfig {
    pub endpoint: String,
    /// Longest text accepted in one request
    pub max_chars: usize,
    pub timeout: Duration,
}

impl Default for GoogleTranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            max_chars: 5000,
            timeout: Duration::from_secs(10),
        }
    }
}

impl GoogleTranslatorConfig {
    pub fn from_settings(settings: &TranslationSettings, timeout: Duration) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            max_chars: settings.max_chars,
            timeout,
        }
    }
}

/// Translator backed by the public Google Translate endpoint
pub struct GoogleTranslator {
    client: Client,
    config: GoogleTranslatorConfig,
}

impl GoogleTranslator {
    pub fn new(config: GoogleTranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                TextProcessingError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client, config })
    }

    async fn request(&self, text: &str, from: Language, to: Language) -> Result<String> {
        let len = text.chars().count();
        if len > self.config.max_chars {
            return Err(TextProcessingError::TooLong {
                len,
                max: self.config.max_chars,
            });
        }

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", from.code()),
                ("tl", to.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextProcessingError::Api(format!("{}: {}", status, body)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TextProcessingError::InvalidResponse(e.to_string()))?;

        parse_segments(&payload)
    }
}

/// Join the translated segments of a `dt=t` response.
///
/// Shape: `[[["translated", "source", ...], ...], null, "en", ...]`
fn parse_segments(payload: &serde_json::Value) -> Result<String> {
    let segments = payload
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TextProcessingError::InvalidResponse("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.trim().is_empty() {
        return Err(TextProcessingError::InvalidResponse(
            "empty translation".to_string(),
        ));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> agrobot_core::Result<String> {
        if from == to {
            return Ok(text.to_string());
        }
        Ok(self.request(text, from, to).await?)
    }

    fn supports_pair(&self, _from: Language, _to: Language) -> bool {
        true
    }

    fn name(&self) -> &str {
        "google"
    }
}
