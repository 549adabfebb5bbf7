//! Transcription stage
//!
//! Turns an uploaded recording into a [`TranscriptionOutcome`]. Remote
//! failures are reported in the outcome instead of as errors, so callers can
//! tell silence apart from a broken service.

use std::sync::Arc;
use std::time::Duration;

use agrobot_core::{
    normalize, transcription_hint_name, with_timeout, AudioInput, Error, Result, Service,
    SpeechToText, TranscriptionOptions, TranscriptionOutcome,
};

/// Bounded wrapper around a [`SpeechToText`] backend
#[derive(Clone)]
pub struct Transcriber {
    stt: Arc<dyn SpeechToText>,
    timeout: Duration,
}

impl Transcriber {
    pub fn new(stt: Arc<dyn SpeechToText>, timeout: Duration) -> Self {
        Self { stt, timeout }
    }

    /// Transcribe `audio`, expected to be spoken in `requested_language`.
    ///
    /// # Returns
    /// `Err` only for empty audio. Every remote outcome is an `Ok`:
    /// - `Text` with trimmed text and the normalized code
    /// - `Empty` when the service recognized nothing
    /// - `Failed` with the code as requested and the failure reason
    pub async fn transcribe(&self, audio: &AudioInput, requested_language: &str) -> Result<TranscriptionOutcome> {
        if audio.is_empty() {
            return Err(Error::validation("Audio file is empty"));
        }

        let language = normalize(requested_language);
        let options = TranscriptionOptions::new(language).with_prompt(format!(
            "Farming conversation in {}.",
            transcription_hint_name(requested_language)
        ));

        let result = with_timeout(
            Service::Transcription,
            self.timeout,
            self.stt.transcribe(audio, &options),
        )
        .await;

        let outcome = match result {
            Ok(text) if text.trim().is_empty() => TranscriptionOutcome::Empty {
                language_used: language.code().to_string(),
            },
            Ok(text) => TranscriptionOutcome::Text {
                text: text.trim().to_string(),
                language_used: language.code().to_string(),
            },
            Err(e) => {
                tracing::warn!(
                    model = self.stt.model_name(),
                    language = requested_language,
                    error = %e,
                    "Transcription failed"
                );
                TranscriptionOutcome::Failed {
                    language_used: requested_language.to_string(),
                    reason: e.to_string(),
                }
            }
        };
        Ok(outcome)
    }
}
