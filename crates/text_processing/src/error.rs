//! Text processing errors

use agrobot_core::Service;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Translation API error: {0}")]
    Api(String),

    #[error("Translation service unreachable: {0}")]
    Network(String),

    #[error("Invalid translation response: {0}")]
    InvalidResponse(String),

    #[error("Text too long for translation: {len} > {max} characters")]
    TooLong { len: usize, max: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TextProcessingError {
    fn from(err: reqwest::Error) -> Self {
        TextProcessingError::Network(err.to_string())
    }
}

impl From<TextProcessingError> for agrobot_core::Error {
    fn from(err: TextProcessingError) -> Self {
        match err {
            TextProcessingError::Configuration(message) => agrobot_core::Error::Configuration(message),
            other => agrobot_core::Error::upstream(Service::Translation, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
