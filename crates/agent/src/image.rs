//! Plant photo analysis
//!
//! Single-shot vision request: the fixed analysis prompt plus the image.
//! Independent of chat sessions and translation.

use std::sync::Arc;
use std::time::Duration;

use agrobot_config::Settings;
use agrobot_core::{
    with_timeout, Error, GenerateRequest, ImageFormat, ImageInput, LanguageModel, Message, Result,
    Service,
};

#[derive(Clone)]
pub struct ImageAnalyzer {
    llm: Arc<dyn LanguageModel>,
    prompt: String,
    timeout: Duration,
}

impl ImageAnalyzer {
    pub fn new(llm: Arc<dyn LanguageModel>, prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            llm,
            prompt: prompt.into(),
            timeout,
        }
    }

    pub fn from_settings(llm: Arc<dyn LanguageModel>, settings: &Settings) -> Self {
        Self::new(llm, settings.prompts.image_analysis.clone(), settings.agent.remote_timeout())
    }

    /// Analyze an uploaded image.
    ///
    /// The format comes from `content_type` when it names a supported image
    /// type, otherwise from the leading bytes.
    pub async fn analyze(&self, data: Vec<u8>, content_type: Option<&str>) -> Result<String> {
        if data.is_empty() {
            return Err(Error::validation("Image file is required"));
        }

        let format = content_type
            .and_then(ImageFormat::from_mime)
            .or_else(|| ImageFormat::sniff(&data))
            .ok_or_else(|| Error::validation("Unsupported image format, use JPEG, PNG, GIF or WebP"))?;

        let request = GenerateRequest {
            messages: vec![Message::user_with_image(self.prompt.clone(), ImageInput::new(data, format))],
        };

        let response = with_timeout(Service::LanguageModel, self.timeout, self.llm.generate(request)).await?;
        let analysis = response.text.trim();
        if analysis.is_empty() {
            return Err(Error::upstream(Service::LanguageModel, "Model returned an empty answer"));
        }
        Ok(analysis.to_string())
    }
}
