//! Speech and localization pipeline
//!
//! Features:
//! - Whisper transcription over an OpenAI-compatible API (Groq)
//! - Chunked MP3 synthesis through the Google Translate voice endpoint
//! - Translate-then-speak localization with pivot-language fallback

pub mod localize;
pub mod stt;
pub mod synthesis;
pub mod transcription;
pub mod tts;

pub use localize::{Localizer, PipelineResult};
pub use stt::{GroqSttConfig, GroqWhisperStt};
pub use synthesis::Synthesizer;
pub use transcription::Transcriber;
pub use tts::{split_for_speech, GoogleTts, GoogleTtsConfig};

use agrobot_core::Service;
use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("STT error: {0}")]
    Stt(String),

    /// Transient transcription failure, eligible for retry
    #[error("STT service unreachable: {0}")]
    SttNetwork(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("{0}")]
    Configuration(String),
}

impl From<PipelineError> for agrobot_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Configuration(message) => agrobot_core::Error::Configuration(message),
            PipelineError::Tts(_) => agrobot_core::Error::upstream(Service::Synthesis, err.to_string()),
            other => agrobot_core::Error::upstream(Service::Transcription, other.to_string()),
        }
    }
}
