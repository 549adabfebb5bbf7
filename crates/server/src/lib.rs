//! AgroBot HTTP server
//!
//! JSON and multipart endpoints for chat, weather, transcription, speech,
//! image analysis and session inspection.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_request, record_stage_latency};
pub use state::{AppState, Backends};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use agrobot_core::Error as CoreError;

/// Server errors
///
/// Rendered as `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Whole-request deadline exceeded
    #[error("{0}")]
    Timeout(String),

    /// Remote service failure, message passed through
    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => Self::BadRequest(message),
            CoreError::Upstream { message, .. } => Self::Upstream(message),
            CoreError::Configuration(message) => Self::Upstream(message),
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                "Internal server error".to_string()
            }
            other => {
                if status.is_server_error() {
                    tracing::warn!(error = %other, "Request failed");
                }
                other.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrobot_core::Service;

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(
            ServerError::from(CoreError::validation("Text is required")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(CoreError::upstream(Service::LanguageModel, "quota")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::from(CoreError::Configuration("GOOGLE_API_KEY is missing".into())).to_string(),
            "GOOGLE_API_KEY is missing"
        );
    }
}
