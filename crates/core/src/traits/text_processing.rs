//! Text processing traits

use crate::{Language, Result};
use async_trait::async_trait;

/// Translation interface
///
/// Implementations:
/// - `GoogleTranslator` - public Google Translate endpoint
/// - `NoopTranslator` - pass-through (disabled)
///
/// # Example
///
/// ```ignore
/// let translator: Arc<dyn Translator> = create_translator(&config)?;
/// let hindi = translator
///     .translate("Irrigate in the evening.", Language::English, Language::Hindi)
///     .await?;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate text between languages
    ///
    /// # Arguments
    /// * `text` - Text to translate
    /// * `from` - Source language
    /// * `to` - Target language
    ///
    /// # Returns
    /// Translated text
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Check if a language pair is supported
    fn supports_pair(&self, from: Language, to: Language) -> bool;

    /// Get translator name
    fn name(&self) -> &str;
}
