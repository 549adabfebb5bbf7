//! Language Model traits

use crate::{GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Language Model interface
///
/// Covers both the turn-by-turn chat path and single-shot vision calls; a
/// vision call is a request whose user message carries an image.
///
/// Implementations:
/// - `GeminiBackend` - Google Gemini `generateContent` API
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(GeminiBackend::new(config)?);
/// let request = GenerateRequest::new().with_user_message("When should I sow wheat?");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate completion
    ///
    /// # Arguments
    /// * `request` - Messages (oldest first) and sampling parameters
    ///
    /// # Returns
    /// Generated response with text and metadata
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
