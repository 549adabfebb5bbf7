//! Speech processing traits

use crate::{AudioInput, Language, Result, SynthesizedAudio};
use async_trait::async_trait;

/// Per-call transcription parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOptions {
    /// Normalized language the audio is expected to be in
    pub language: Language,
    /// Free-text hint biasing recognition vocabulary
    pub prompt: Option<String>,
}

impl TranscriptionOptions {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// Speech-to-Text interface
///
/// Implementations:
/// - `GroqWhisperStt` - Whisper hosted behind an OpenAI-compatible endpoint
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(GroqWhisperStt::new(config)?);
/// let options = TranscriptionOptions::new(Language::Hindi)
///     .with_prompt("Farming conversation in Hindi.");
/// let text = stt.transcribe(&audio, &options).await?;
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a complete recording
    ///
    /// # Arguments
    /// * `audio` - Recorded audio with its container format
    /// * `options` - Expected language and recognition hint
    ///
    /// # Returns
    /// Recognized text exactly as the service returned it (may be blank)
    async fn transcribe(&self, audio: &AudioInput, options: &TranscriptionOptions) -> Result<String>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}

/// Text-to-Speech interface
///
/// Implementations:
/// - `GoogleTts` - Google Translate speech endpoint (MP3)
///
/// # Example
///
/// ```ignore
/// let tts: Arc<dyn TextToSpeech> = Arc::new(GoogleTts::new(config)?);
/// let audio = tts.synthesize("నీరు పెట్టండి", Language::Telugu).await?;
/// ```
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize text to audio
    ///
    /// # Arguments
    /// * `text` - Text to speak, already in `language`
    /// * `language` - Voice language
    ///
    /// # Returns
    /// Encoded audio bytes
    async fn synthesize(&self, text: &str, language: Language) -> Result<SynthesizedAudio>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
