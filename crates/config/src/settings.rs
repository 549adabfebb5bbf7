//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{endpoints, limits, models, prompts, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat and vision model
    #[serde(default)]
    pub llm: LlmSettings,

    /// Speech recognition service
    #[serde(default)]
    pub stt: SttSettings,

    /// Speech synthesis service
    #[serde(default)]
    pub tts: TtsSettings,

    /// Translation service
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Weather provider
    #[serde(default)]
    pub weather: WeatherSettings,

    /// Session and orchestration behaviour
    #[serde(default)]
    pub agent: AgentSettings,

    /// Fixed prompt texts
    #[serde(default)]
    pub prompts: PromptSettings,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS restrictions (disabled means permissive)
    #[serde(default)]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Largest accepted request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000)
}

fn default_max_upload_bytes() -> usize {
    limits::MAX_UPLOAD_BYTES
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: false,
            cors_origins: Vec::new(),
            max_upload_bytes: default_max_upload_bytes(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Read a provider key from its conventional environment variable
fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Falls back to `GOOGLE_API_KEY`
    #[serde(default = "default_llm_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Retries for transient failures (network, 5xx)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff, doubled per retry
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_llm_model() -> String {
    models::CHAT.to_string()
}
fn default_llm_endpoint() -> String {
    endpoints::GEMINI.to_string()
}
fn default_llm_api_key() -> Option<String> {
    env_key("GOOGLE_API_KEY")
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    512
}
fn default_top_p() -> f32 {
    0.95
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            api_key: default_llm_api_key(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Speech recognition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSettings {
    #[serde(default = "default_stt_endpoint")]
    pub endpoint: String,

    /// Falls back to `GROQ_API_KEY`
    #[serde(default = "default_stt_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_stt_model")]
    pub model: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_stt_endpoint() -> String {
    endpoints::GROQ.to_string()
}
fn default_stt_api_key() -> Option<String> {
    env_key("GROQ_API_KEY")
}
fn default_stt_model() -> String {
    models::TRANSCRIPTION.to_string()
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            endpoint: default_stt_endpoint(),
            api_key: default_stt_api_key(),
            model: default_stt_model(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Speech synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSettings {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Longest chunk sent per request
    #[serde(default = "default_tts_chunk_chars")]
    pub max_chunk_chars: usize,
}

fn default_tts_endpoint() -> String {
    endpoints::GOOGLE_TTS.to_string()
}
fn default_tts_chunk_chars() -> usize {
    limits::TTS_CHUNK_CHARS
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            max_chunk_chars: default_tts_chunk_chars(),
        }
    }
}

/// Translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Public Google Translate endpoint
    #[default]
    Google,
    /// Pass-through
    Disabled,
}

/// Translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default)]
    pub provider: TranslationProvider,

    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    /// Longest text accepted in one request
    #[serde(default = "default_translation_max_chars")]
    pub max_chars: usize,
}

fn default_translation_endpoint() -> String {
    endpoints::GOOGLE_TRANSLATE.to_string()
}
fn default_translation_max_chars() -> usize {
    limits::TRANSLATION_MAX_CHARS
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_translation_endpoint(),
            max_chars: default_translation_max_chars(),
        }
    }
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,

    /// Falls back to `OPENWEATHER_API_KEY`
    #[serde(default = "default_weather_api_key")]
    pub api_key: Option<String>,
}

fn default_weather_endpoint() -> String {
    endpoints::OPENWEATHER.to_string()
}
fn default_weather_api_key() -> Option<String> {
    env_key("OPENWEATHER_API_KEY")
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            api_key: default_weather_api_key(),
        }
    }
}

/// Session and orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Turns kept per session, oldest evicted first (0 = unbounded)
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    #[serde(default = "default_session_idle")]
    pub session_idle_timeout_secs: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Bound applied to every remote call
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,
}

fn default_max_history_turns() -> usize {
    limits::MAX_HISTORY_TURNS
}
fn default_session_idle() -> u64 {
    timeouts::SESSION_IDLE_SECS
}
fn default_cleanup_interval() -> u64 {
    timeouts::SESSION_CLEANUP_SECS
}
fn default_remote_timeout() -> u64 {
    timeouts::REMOTE_CALL_SECS
}

impl AgentSettings {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            session_idle_timeout_secs: default_session_idle(),
            cleanup_interval_secs: default_cleanup_interval(),
            remote_timeout_secs: default_remote_timeout(),
        }
    }
}

/// Prompt texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSettings {
    #[serde(default = "default_system_policy")]
    pub system_policy: String,

    #[serde(default = "default_image_analysis")]
    pub image_analysis: String,

    #[serde(default = "default_empty_input_reply")]
    pub empty_input_reply: String,
}

fn default_system_policy() -> String {
    prompts::SYSTEM_POLICY.to_string()
}
fn default_image_analysis() -> String {
    prompts::IMAGE_ANALYSIS.to_string()
}
fn default_empty_input_reply() -> String {
    prompts::EMPTY_INPUT_REPLY.to_string()
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            system_policy: default_system_policy(),
            image_analysis: default_image_analysis(),
            empty_input_reply: default_empty_input_reply(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_agent()?;

        if self.tts.max_chunk_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.max_chunk_chars".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.prompts.system_policy.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "prompts.system_policy".to_string(),
                message: "System policy cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".to_string(),
                message: "Upload limit must be at least 1 byte".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "llm.top_p".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.llm.top_p),
            });
        }

        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        if self.agent.remote_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.remote_timeout_secs".to_string(),
                message: "Remote call timeout must be at least 1 second".to_string(),
            });
        }

        if self.agent.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.cleanup_interval_secs".to_string(),
                message: "Cleanup interval must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Copy with every credential masked, safe to log
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***".to_string());
        let mut copy = self.clone();
        copy.llm.api_key = mask(&self.llm.api_key);
        copy.stt.api_key = mask(&self.stt.api_key);
        copy.weather.api_key = mask(&self.weather.api_key);
        copy
    }

    /// Render as YAML (credentials masked)
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&self.redacted())?)
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false));

    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&dir.join(env_name).to_string_lossy()).required(false));
    }

    // AGROBOT__SERVER__PORT=8080 style overrides
    builder = builder.add_source(
        Environment::with_prefix("AGROBOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert_eq!(settings.stt.model, "whisper-large-v3-turbo");
        assert_eq!(settings.agent.remote_timeout(), Duration::from_secs(10));
        assert_eq!(settings.prompts.empty_input_reply, "Please enter a valid question.");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.llm.temperature = 3.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.agent.remote_timeout_secs = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.prompts.system_policy = "   ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_redacted_yaml_hides_keys() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("secret-gemini".to_string());
        settings.weather.api_key = Some("secret-weather".to_string());

        let yaml = settings.to_yaml().unwrap();
        assert!(!yaml.contains("secret-gemini"));
        assert!(!yaml.contains("secret-weather"));
        assert!(yaml.contains("***"));
    }

    #[test]
    fn test_load_from_yaml_layers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 7000\nagent:\n  max_history_turns: 6\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.yaml"),
            "server:\n  port: 7100\nweather:\n  endpoint: http://localhost:9000/weather\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.server.port, 7100);
        assert_eq!(settings.agent.max_history_turns, 6);
        assert_eq!(settings.weather.endpoint, "http://localhost:9000/weather");
        // Untouched sections keep their defaults
        assert_eq!(settings.tts.max_chunk_chars, 100);
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.translation.provider, TranslationProvider::Google);
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.yaml"), "llm:\n  temperature: 9.5\n").unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), None),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
