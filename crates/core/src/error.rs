//! Error types shared across the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Remote capability that produced an upstream failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    LanguageModel,
    Transcription,
    Translation,
    Synthesis,
    Weather,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageModel => "language_model",
            Self::Transcription => "transcription",
            Self::Translation => "translation",
            Self::Synthesis => "synthesis",
            Self::Weather => "weather",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error taxonomy
///
/// Translation and synthesis failures inside the localization stage are
/// absorbed there and never surface through this type.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Missing or empty required input
    #[error("{0}")]
    Validation(String),

    /// Remote service unavailable, timed out, or rejected the request
    #[error("{message}")]
    Upstream { service: Service, message: String },

    /// Missing credentials or invalid settings
    #[error("{0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream(service: Service, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Service that caused the failure, if any
    pub fn service(&self) -> Option<Service> {
        match self {
            Self::Upstream { service, .. } => Some(*service),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("Serialization error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
