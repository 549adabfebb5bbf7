//! Translation backends
//!
//! All backends translate from the pivot language into a target language;
//! callers decide what to do when a translation fails.

mod google;
mod noop;

pub use google::{GoogleTranslator, GoogleTranslatorConfig};
pub use noop::NoopTranslator;

use std::sync::Arc;
use std::time::Duration;

use agrobot_config::{TranslationProvider, TranslationSettings};
use agrobot_core::Translator;

use crate::Result;

/// Create translator based on config
pub fn create_translator(
    settings: &TranslationSettings,
    timeout: Duration,
) -> Result<Arc<dyn Translator>> {
    match settings.provider {
        TranslationProvider::Google => {
            let config = GoogleTranslatorConfig::from_settings(settings, timeout);
            tracing::info!(endpoint = %config.endpoint, "Using Google translator");
            Ok(Arc::new(GoogleTranslator::new(config)?))
        }
        TranslationProvider::Disabled => {
            tracing::info!("Translation disabled, answers stay in the pivot language");
            Ok(Arc::new(NoopTranslator::new()))
        }
    }
}
