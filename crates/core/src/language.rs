//! Language definitions and code normalization
//!
//! Every stage that needs a language code (transcription, translation,
//! synthesis) resolves it through [`normalize`], so a single requested
//! code maps to the same [`Language`] across the whole pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported languages
///
/// The conversational core always answers in [`Language::PIVOT`]; every other
/// member is a translation and synthesis target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
    Tamil,
    Marathi,
    Bengali,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
}

const ALL: [Language; 10] = [
    Language::English,
    Language::Hindi,
    Language::Telugu,
    Language::Tamil,
    Language::Marathi,
    Language::Bengali,
    Language::Gujarati,
    Language::Kannada,
    Language::Malayalam,
    Language::Punjabi,
];

impl Language {
    /// Language the model always answers in before any translation
    pub const PIVOT: Language = Language::English;

    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Telugu => "te",
            Self::Tamil => "ta",
            Self::Marathi => "mr",
            Self::Bengali => "bn",
            Self::Gujarati => "gu",
            Self::Kannada => "kn",
            Self::Malayalam => "ml",
            Self::Punjabi => "pa",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Telugu => "Telugu",
            Self::Tamil => "Tamil",
            Self::Marathi => "Marathi",
            Self::Bengali => "Bengali",
            Self::Gujarati => "Gujarati",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Punjabi => "Punjabi",
        }
    }

    /// All supported languages, pivot first
    pub fn all() -> &'static [Language] {
        &ALL
    }

    /// Exact, case-insensitive code lookup
    pub fn from_code(code: &str) -> Option<Language> {
        ALL.iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Whether this is the pivot language
    pub fn is_pivot(&self) -> bool {
        *self == Self::PIVOT
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolve any requested language identifier to a supported language.
///
/// Total and side-effect free: an exact case-insensitive code match wins,
/// anything else (empty, unknown, padded with whitespace) resolves to the
/// pivot language.
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize("HI"), Language::Hindi);
/// assert_eq!(normalize("klingon"), Language::English);
/// ```
pub fn normalize(requested: &str) -> Language {
    Language::from_code(requested).unwrap_or(Language::PIVOT)
}

/// Human-readable language name used to bias transcription.
///
/// Unmapped codes are passed through verbatim so the hint still carries
/// whatever the caller asked for.
pub fn transcription_hint_name(requested: &str) -> String {
    match Language::from_code(requested) {
        Some(lang) => lang.name().to_string(),
        None => requested.to_string(),
    }
}
