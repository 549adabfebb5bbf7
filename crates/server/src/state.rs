//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use agrobot_agent::{ChatOrchestrator, ImageAnalyzer, SessionStore};
use agrobot_config::Settings;
use agrobot_core::{LanguageModel, SpeechToText, TextToSpeech, Translator, WeatherProvider};
use agrobot_llm::{GeminiBackend, GeminiConfig};
use agrobot_pipeline::{
    GoogleTts, GoogleTtsConfig, GroqSttConfig, GroqWhisperStt, Localizer, Synthesizer, Transcriber,
};
use agrobot_text_processing::create_translator;
use agrobot_weather::{OpenWeatherClient, OpenWeatherConfig, WeatherService};

use crate::ServerError;

/// Remote capability implementations
#[derive(Clone)]
pub struct Backends {
    pub llm: Arc<dyn LanguageModel>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub translator: Arc<dyn Translator>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl Backends {
    /// Production backends built from configuration
    pub fn from_settings(config: &Settings) -> Result<Self, ServerError> {
        let timeout = config.agent.remote_timeout();
        let startup = |e: agrobot_core::Error| ServerError::Internal(e.to_string());

        let llm = GeminiBackend::new(GeminiConfig::from_settings(&config.llm, timeout))
            .map_err(|e| startup(e.into()))?;
        let stt = GroqWhisperStt::new(GroqSttConfig::from_settings(&config.stt, timeout))
            .map_err(|e| startup(e.into()))?;
        let tts = GoogleTts::new(GoogleTtsConfig::from_settings(&config.tts, timeout))
            .map_err(|e| startup(e.into()))?;
        let translator = create_translator(&config.translation, timeout).map_err(|e| startup(e.into()))?;
        let weather = OpenWeatherClient::new(OpenWeatherConfig::from_settings(&config.weather, timeout))
            .map_err(|e| startup(e.into()))?;

        Ok(Self {
            llm: Arc::new(llm),
            stt: Arc::new(stt),
            tts: Arc::new(tts),
            translator,
            weather: Arc::new(weather),
        })
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: Arc<SessionStore>,
    pub chat: ChatOrchestrator,
    pub images: ImageAnalyzer,
    pub weather: WeatherService,
    pub transcriber: Transcriber,
    pub localizer: Localizer,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with production backends
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let backends = Backends::from_settings(&config)?;
        Ok(Self::with_backends(config, backends))
    }

    /// Create state around the given backends
    pub fn with_backends(config: Settings, backends: Backends) -> Self {
        let timeout = config.agent.remote_timeout();
        let synthesizer = Synthesizer::new(backends.tts, timeout);

        Self {
            sessions: Arc::new(SessionStore::from_settings(&config.agent)),
            chat: ChatOrchestrator::from_settings(backends.llm.clone(), &config),
            images: ImageAnalyzer::from_settings(backends.llm, &config),
            weather: WeatherService::new(backends.weather, timeout),
            transcriber: Transcriber::new(backends.stt, timeout),
            localizer: Localizer::new(backends.translator, synthesizer, timeout),
            metrics: None,
            config: Arc::new(config),
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}
