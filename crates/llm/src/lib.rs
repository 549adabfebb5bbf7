//! Language model integration
//!
//! Features:
//! - Context assembly (policy, weather grounding, turn history)
//! - Gemini backend with bounded retry and exponential backoff

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiBackend, GeminiConfig};
pub use prompt::{assemble, compose_turn, ContextAssembler};

use agrobot_core::Service;
use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Language model API error: {0}")]
    Api(String),

    #[error("Language model unreachable: {0}")]
    Network(String),

    #[error("Invalid language model response: {0}")]
    InvalidResponse(String),

    #[error("Language model request timed out")]
    Timeout,

    #[error("{0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for agrobot_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(message) => agrobot_core::Error::Configuration(message),
            other => agrobot_core::Error::upstream(Service::LanguageModel, other.to_string()),
        }
    }
}
