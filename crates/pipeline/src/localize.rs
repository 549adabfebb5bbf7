//! Response localization
//!
//! Translates a pivot-language answer into the requested language and speaks
//! it. Translation and synthesis failures degrade the result instead of
//! failing it:
//! - translation failure: the pivot text is returned verbatim and
//!   `language_used` reverts to the pivot language
//! - synthesis failure: text fields are returned with no audio

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use agrobot_core::{
    normalize, with_timeout, Error, Language, Result, Service, SynthesizedAudio, Translator,
};

use crate::Synthesizer;

/// Output of one localization pass
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Answer in the pivot language
    pub response_text: String,
    /// Answer in `language_used`
    pub translated_text: String,
    /// Language of `translated_text`, the pivot language after a fallback
    pub language_used: Language,
    #[serde(skip)]
    pub audio: Option<SynthesizedAudio>,
}

/// Translate-then-speak stage
#[derive(Clone)]
pub struct Localizer {
    translator: Arc<dyn Translator>,
    synthesizer: Synthesizer,
    timeout: Duration,
}

impl Localizer {
    pub fn new(translator: Arc<dyn Translator>, synthesizer: Synthesizer, timeout: Duration) -> Self {
        Self {
            translator,
            synthesizer,
            timeout,
        }
    }

    /// Localize `pivot_text` for `requested_language`.
    ///
    /// Fails only on blank input.
    pub async fn localize(&self, pivot_text: &str, requested_language: &str) -> Result<PipelineResult> {
        if pivot_text.trim().is_empty() {
            return Err(Error::validation("Text is required"));
        }

        let target = normalize(requested_language);
        let (translated_text, language_used) = self.translate(pivot_text, target).await;

        let audio = match self.synthesizer.synthesize(&translated_text, language_used).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(language = %language_used, error = %e, "Speech synthesis failed, returning text only");
                metrics::counter!("agrobot_fallbacks_total", "kind" => "synthesis").increment(1);
                None
            }
        };

        Ok(PipelineResult {
            response_text: pivot_text.to_string(),
            translated_text,
            language_used,
            audio,
        })
    }

    async fn translate(&self, pivot_text: &str, target: Language) -> (String, Language) {
        if target.is_pivot() {
            return (pivot_text.to_string(), Language::PIVOT);
        }

        let attempt = if self.translator.supports_pair(Language::PIVOT, target) {
            with_timeout(
                Service::Translation,
                self.timeout,
                self.translator.translate(pivot_text, Language::PIVOT, target),
            )
            .await
        } else {
            Err(Error::upstream(
                Service::Translation,
                format!("{} cannot translate {} to {}", self.translator.name(), Language::PIVOT, target),
            ))
        };

        match attempt {
            Ok(text) if !text.trim().is_empty() => (text, target),
            Ok(_) => self.fall_back(pivot_text, target, "empty translation"),
            Err(e) => self.fall_back(pivot_text, target, &e.to_string()),
        }
    }

    fn fall_back(&self, pivot_text: &str, target: Language, reason: &str) -> (String, Language) {
        tracing::warn!(
            translator = self.translator.name(),
            target = %target,
            reason,
            "Translation failed, falling back to pivot language"
        );
        metrics::counter!("agrobot_fallbacks_total", "kind" => "translation").increment(1);
        (pivot_text.to_string(), Language::PIVOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrobot_core::TextToSpeech;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Behaviour {
        Echo(&'static str),
        Fail,
        Hang,
    }

    struct MockTranslator {
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl MockTranslator {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(&self, _text: &str, _from: Language, _to: Language) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Echo(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(Error::upstream(Service::Translation, "429 Too Many Requests")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok("too late".to_string())
                }
            }
        }

        fn supports_pair(&self, _from: Language, _to: Language) -> bool {
            true
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct RecordingTts {
        fail: bool,
        spoken: Mutex<Vec<(String, Language)>>,
    }

    impl RecordingTts {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                spoken: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextToSpeech for RecordingTts {
        async fn synthesize(&self, text: &str, language: Language) -> Result<SynthesizedAudio> {
            self.spoken.lock().unwrap().push((text.to_string(), language));
            if self.fail {
                return Err(Error::upstream(Service::Synthesis, "speech endpoint down"));
            }
            Ok(SynthesizedAudio::mp3(vec![0xff, 0xfb]))
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn localizer(translator: Arc<MockTranslator>, tts: Arc<RecordingTts>) -> Localizer {
        let timeout = Duration::from_millis(100);
        Localizer::new(translator, Synthesizer::new(tts, timeout), timeout)
    }

    const ANSWER: &str = "Water your tomatoes in the early morning.";

    #[tokio::test]
    async fn test_translates_and_speaks_target_language() {
        let translator = MockTranslator::new(Behaviour::Echo("सुबह जल्दी टमाटर को पानी दें।"));
        let tts = RecordingTts::new(false);

        let result = localizer(translator, tts.clone()).localize(ANSWER, "hi").await.unwrap();

        assert_eq!(result.response_text, ANSWER);
        assert_eq!(result.translated_text, "सुबह जल्दी टमाटर को पानी दें।");
        assert_eq!(result.language_used, Language::Hindi);
        assert!(result.audio.is_some());
        assert_eq!(tts.spoken.lock().unwrap()[0].1, Language::Hindi);
    }

    #[tokio::test]
    async fn test_pivot_request_skips_translation() {
        let translator = MockTranslator::new(Behaviour::Fail);
        let result = localizer(translator.clone(), RecordingTts::new(false))
            .localize(ANSWER, "EN")
            .await
            .unwrap();

        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.translated_text, ANSWER);
        assert_eq!(result.language_used, Language::English);
    }

    #[tokio::test]
    async fn test_unknown_language_is_treated_as_pivot() {
        let translator = MockTranslator::new(Behaviour::Echo("unused"));
        let result = localizer(translator.clone(), RecordingTts::new(false))
            .localize(ANSWER, "klingon")
            .await
            .unwrap();

        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.language_used, Language::PIVOT);
    }

    #[tokio::test]
    async fn test_translation_failure_reverts_to_pivot() {
        let tts = RecordingTts::new(false);
        let result = localizer(MockTranslator::new(Behaviour::Fail), tts.clone())
            .localize(ANSWER, "te")
            .await
            .unwrap();

        assert_eq!(result.translated_text, ANSWER);
        assert_eq!(result.language_used, Language::English);
        // Speech follows the resolved pair, not the request
        assert_eq!(tts.spoken.lock().unwrap()[0], (ANSWER.to_string(), Language::English));
    }

    #[tokio::test]
    async fn test_translation_timeout_reverts_to_pivot() {
        let result = localizer(MockTranslator::new(Behaviour::Hang), RecordingTts::new(false))
            .localize(ANSWER, "ta")
            .await
            .unwrap();

        assert_eq!(result.translated_text, ANSWER);
        assert_eq!(result.language_used, Language::English);
    }

    #[tokio::test]
    async fn test_synthesis_failure_keeps_text() {
        let translator = MockTranslator::new(Behaviour::Echo("ਸਵੇਰੇ ਪਾਣੀ ਦਿਓ।"));
        let result = localizer(translator, RecordingTts::new(true))
            .localize(ANSWER, "pa")
            .await
            .unwrap();

        assert!(result.audio.is_none());
        assert_eq!(result.translated_text, "ਸਵੇਰੇ ਪਾਣੀ ਦਿਓ।");
        assert_eq!(result.language_used, Language::Punjabi);
    }

    #[tokio::test]
    async fn test_blank_text_is_validation_error() {
        let err = localizer(MockTranslator::new(Behaviour::Fail), RecordingTts::new(false))
            .localize(" \n", "hi")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
