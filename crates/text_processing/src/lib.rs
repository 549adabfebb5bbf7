//! Text processing for the AgroBot assistant
//!
//! Provides the translation capability used to localize pivot-language
//! answers:
//! - **GoogleTranslator**: public Google Translate endpoint
//! - **NoopTranslator**: pass-through when translation is disabled
//!
//! # Example
//!
//! ```ignore
//! use agrobot_text_processing::create_translator;
//!
//! let translator = create_translator(&settings.translation, Duration::from_secs(10))?;
//! let telugu = translator.translate("Water in the evening.", Language::English, Language::Telugu).await?;
//! ```

pub mod translation;

mod error;

pub use error::{Result, TextProcessingError};
pub use translation::{create_translator, GoogleTranslator, GoogleTranslatorConfig, NoopTranslator};
