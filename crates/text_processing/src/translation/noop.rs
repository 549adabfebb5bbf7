//! Pass-through translator

use agrobot_core::{Language, Result, Translator};
use async_trait::async_trait;

/// Returns the input unchanged
#[derive(Debug, Default, Clone)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
        Ok(text.to_string())
    }

    fn supports_pair(&self, from: Language, to: Language) -> bool {
        from == to
    }

    fn name(&self) -> &str {
        "noop"
    }
}
