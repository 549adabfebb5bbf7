//! Transcription outcome

use serde::{Deserialize, Serialize};

/// Result of one transcription attempt.
///
/// Distinguishes genuinely silent audio from a failed remote call, both of
/// which surface as empty text to callers that only look at [`text`](Self::text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranscriptionOutcome {
    /// Recognized speech, `language_used` is the normalized code
    Text { text: String, language_used: String },
    /// Service answered but recognized nothing
    Empty { language_used: String },
    /// Service call failed, `language_used` is the code as requested
    Failed { language_used: String, reason: String },
}

impl TranscriptionOutcome {
    /// Recognized text, or the empty sentinel
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Empty { .. } | Self::Failed { .. } => "",
        }
    }

    pub fn language_used(&self) -> &str {
        match self {
            Self::Text { language_used, .. }
            | Self::Empty { language_used }
            | Self::Failed { language_used, .. } => language_used,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Consume into the recognized text, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
