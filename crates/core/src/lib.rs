//! Core traits and types for the AgroBot assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Capability traits for remote backends (STT, TTS, LLM, translation, weather)
//! - Language definitions and code normalization
//! - Conversation turns and per-session history
//! - Error taxonomy and the uniform remote-call deadline

pub mod audio;
pub mod conversation;
pub mod error;
pub mod language;
pub mod llm_types;
pub mod location;
pub mod timeout;
pub mod traits;
pub mod transcript;

pub use audio::{AudioFormat, AudioInput, SynthesizedAudio};
pub use conversation::{ConversationSession, ConversationTurn, TurnRole};
pub use error::{Error, Result, Service};
pub use language::{normalize, transcription_hint_name, Language};
pub use llm_types::{
    FinishReason, GenerateRequest, GenerateResponse, ImageFormat, ImageInput, Message, Role,
    TokenUsage,
};
pub use location::Location;
pub use timeout::{with_timeout, DEFAULT_REMOTE_TIMEOUT};
pub use transcript::TranscriptionOutcome;

pub use traits::{
    LanguageModel, SpeechToText, TextToSpeech, TranscriptionOptions, Translator, WeatherProvider,
};
