//! Speech synthesis stage

use std::sync::Arc;
use std::time::Duration;

use agrobot_core::{with_timeout, Error, Language, Result, Service, SynthesizedAudio, TextToSpeech};

/// Bounded wrapper around a [`TextToSpeech`] backend
#[derive(Clone)]
pub struct Synthesizer {
    tts: Arc<dyn TextToSpeech>,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(tts: Arc<dyn TextToSpeech>, timeout: Duration) -> Self {
        Self { tts, timeout }
    }

    /// Speak `text` in `language`.
    ///
    /// Blank text is rejected before any remote call. A backend that answers
    /// with zero bytes counts as a failure.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<SynthesizedAudio> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::validation("Text is required"));
        }

        let audio = with_timeout(
            Service::Synthesis,
            self.timeout,
            self.tts.synthesize(text, language),
        )
        .await?;

        if audio.data.is_empty() {
            return Err(Error::upstream(Service::Synthesis, "Speech service returned no audio"));
        }
        Ok(audio)
    }
}
