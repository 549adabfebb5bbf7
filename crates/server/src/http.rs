//! HTTP Endpoints
//!
//! REST API for the farming assistant.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Json, Multipart, Path, Query, State,
    },
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use agrobot_agent::{SessionStore, SessionView};
use agrobot_config::constants::service;
use agrobot_core::{AudioFormat, AudioInput, Error as CoreError, Language, Location, Service, TranscriptionOutcome};
use agrobot_weather::{WeatherSnapshot, WeatherSummary};

use crate::metrics::{metrics_handler, record_stage_latency, track_requests};
use crate::state::AppState;
use crate::ServerError;

const DEFAULT_LANGUAGE: &str = "en";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins, state.config.server.cors_enabled);
    let body_limit = state.config.server.max_upload_bytes;
    let request_timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/weather", get(weather))
        .route("/api/transcribe", post(transcribe))
        .route("/api/tts", post(tts))
        .route("/api/analyze-image", post(analyze_image))
        .route("/api/voice", post(voice))
        .route("/api/languages", get(languages))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Render a request that outlived the deadline as a JSON error
async fn handle_timeout(err: BoxError) -> ServerError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded the server deadline");
        ServerError::Timeout("Request timed out".to_string())
    } else {
        ServerError::Internal(err.to_string())
    }
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, every origin is allowed
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::permissive();
    }

    let mut parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        parsed_origins.push(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

// Chat

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Either a `/api/weather` response or a bare snapshot
    #[serde(default, rename = "weatherContext")]
    pub weather_context: Option<serde_json::Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeatherContext {
    Summary { details: WeatherSnapshot },
    Snapshot(WeatherSnapshot),
}

/// Read client-supplied weather context; unusable shapes are ignored
fn weather_snapshot(value: &serde_json::Value) -> Option<WeatherSnapshot> {
    let snapshot = match serde_json::from_value::<WeatherContext>(value.clone()) {
        Ok(WeatherContext::Summary { details }) => details,
        Ok(WeatherContext::Snapshot(snapshot)) => snapshot,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable weather context");
            return None;
        }
    };
    (!snapshot.location.is_empty()).then_some(snapshot)
}

fn session_id_or_new(requested: Option<String>) -> String {
    requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(SessionStore::new_id)
}

/// POST /api/chat
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = body.map_err(|e| ServerError::bad_request(e.body_text()))?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ServerError::bad_request("Message is required"));
    }

    let session_id = session_id_or_new(request.session_id);
    let weather = request.weather_context.as_ref().and_then(weather_snapshot);
    let session = state.sessions.get_or_create(&session_id);

    let start = Instant::now();
    let response = state.chat.respond_in(&session, message, weather.as_ref()).await?;
    record_stage_latency("chat", start.elapsed());

    tracing::info!(session_id = %session_id, grounded = weather.is_some(), "Chat answered");
    Ok(Json(ChatResponse { response, session_id }))
}

// Weather

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub city: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(value: Option<&str>) -> Result<Option<f64>, ServerError> {
    value
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| ServerError::bad_request("Latitude and longitude must be numbers"))
        })
        .transpose()
}

/// Provider and configuration failures are the caller's to fix (400);
/// anything else is reported generically.
fn weather_error(err: CoreError) -> ServerError {
    match err {
        CoreError::Validation(message)
        | CoreError::Configuration(message)
        | CoreError::Upstream {
            service: Service::Weather,
            message,
        } => ServerError::BadRequest(message),
        other => {
            tracing::error!(error = %other, "Unexpected weather failure");
            ServerError::Upstream("Failed to fetch weather data".to_string())
        }
    }
}

/// GET /api/weather?lat=..&lon=.. or ?city=..
async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherSummary>, ServerError> {
    let city = non_blank(&query.city);
    let (lat, lon) = (non_blank(&query.lat), non_blank(&query.lon));

    if city.is_none() && (lat.is_none() || lon.is_none()) {
        return Err(ServerError::bad_request("Provide latitude/longitude or a city name"));
    }

    let location = match city {
        Some(city) => Location::City(city.to_string()),
        None => Location::resolve(parse_coordinate(lat)?, parse_coordinate(lon)?, None).map_err(weather_error)?,
    };

    let start = Instant::now();
    let summary = state.weather.summary(&location).await.map_err(weather_error)?;
    record_stage_latency("weather", start.elapsed());
    Ok(Json(summary))
}

// Multipart uploads

struct UploadPart {
    data: Bytes,
    file_name: Option<String>,
    content_type: Option<String>,
}

/// All parts of a multipart body, keyed by field name
struct UploadForm {
    parts: HashMap<String, UploadPart>,
}

impl UploadForm {
    /// Read every part; a body that is not multipart reads as `missing`
    async fn read(multipart: Result<Multipart, MultipartRejection>, missing: &str) -> Result<Self, ServerError> {
        let mut multipart = multipart.map_err(|_| ServerError::bad_request(missing))?;
        let mut parts = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::bad_request(format!("Failed to read multipart field: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::bad_request(format!("Failed to read multipart field: {}", e)))?;

            parts.insert(
                name,
                UploadPart {
                    data,
                    file_name,
                    content_type,
                },
            );
        }
        Ok(Self { parts })
    }

    fn take(&mut self, name: &str) -> Option<UploadPart> {
        self.parts.remove(name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.parts
            .get(name)
            .map(|part| String::from_utf8_lossy(&part.data).trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// The recording under `audio`, with its container guessed from the file name
    fn audio(&mut self) -> Result<AudioInput, ServerError> {
        let part = self
            .take("audio")
            .ok_or_else(|| ServerError::bad_request("Audio file is required"))?;
        let format = part
            .file_name
            .as_deref()
            .map(AudioFormat::from_filename)
            .unwrap_or(AudioFormat::Wav);
        Ok(AudioInput::new(part.data.to_vec(), format))
    }

    fn language(&self) -> String {
        self.text("language").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}

/// Recognized text, or the 500 the API reports for silence and failures
fn transcript_text(outcome: TranscriptionOutcome) -> Result<(String, String), ServerError> {
    match outcome {
        TranscriptionOutcome::Text { text, language_used } => Ok((text, language_used)),
        TranscriptionOutcome::Empty { .. } => {
            tracing::warn!("Transcription recognized no speech");
            Err(ServerError::Upstream("Transcription returned empty result".to_string()))
        }
        TranscriptionOutcome::Failed { reason, .. } => {
            tracing::warn!(reason = %reason, "Transcription failed");
            Err(ServerError::Upstream("Transcription returned empty result".to_string()))
        }
    }
}

// Transcription

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub language: String,
}

/// POST /api/transcribe (multipart `audio`, `language`)
async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, ServerError> {
    let mut form = UploadForm::read(multipart, "Audio file is required").await?;
    let audio = form.audio()?;
    let language = form.language();

    tracing::info!(bytes = audio.data.len(), language = %language, "Received audio");

    let start = Instant::now();
    let outcome = state.transcriber.transcribe(&audio, &language).await?;
    record_stage_latency("transcribe", start.elapsed());

    let (text, language) = transcript_text(outcome)?;
    Ok(Json(TranscribeResponse { text, language }))
}

// Speech

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    /// Base64 MP3, absent when synthesis failed
    pub audio: Option<String>,
    pub translated_text: String,
    /// Language of `translated_text`
    pub language: String,
    pub format: &'static str,
}

/// POST /api/tts
async fn tts(
    State(state): State<AppState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Json<TtsResponse>, ServerError> {
    let Json(request) = body.map_err(|e| ServerError::bad_request(e.body_text()))?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(ServerError::bad_request("Text is required"));
    }

    let start = Instant::now();
    let result = state.localizer.localize(text, &request.language).await?;
    record_stage_latency("localize", start.elapsed());

    Ok(Json(TtsResponse {
        audio: result.audio.map(|audio| BASE64.encode(audio.data)),
        translated_text: result.translated_text,
        language: result.language_used.code().to_string(),
        format: AudioFormat::Mp3.extension(),
    }))
}

// Image analysis

#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    pub analysis: String,
}

/// POST /api/analyze-image (multipart `image`)
async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeImageResponse>, ServerError> {
    let mut form = UploadForm::read(multipart, "Image file is required").await?;
    let image = form
        .take("image")
        .filter(|part| !part.data.is_empty())
        .ok_or_else(|| ServerError::bad_request("Image file is required"))?;

    let start = Instant::now();
    let analysis = state
        .images
        .analyze(image.data.to_vec(), image.content_type.as_deref())
        .await?;
    record_stage_latency("image", start.elapsed());

    Ok(Json(AnalyzeImageResponse { analysis }))
}

// Full voice turn

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub transcript: String,
    pub response: String,
    pub translated_text: String,
    pub language: String,
    pub audio: Option<String>,
    pub format: &'static str,
    pub session_id: String,
}

/// POST /api/voice (multipart `audio`, `language`, optional `session_id`)
///
/// transcribe, answer in the pivot language, then localize
async fn voice(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VoiceResponse>, ServerError> {
    let mut form = UploadForm::read(multipart, "Audio file is required").await?;
    let audio = form.audio()?;
    let language = form.language();
    let session_id = session_id_or_new(form.text("session_id"));

    let start = Instant::now();
    let outcome = state.transcriber.transcribe(&audio, &language).await?;
    record_stage_latency("transcribe", start.elapsed());
    let (transcript, _) = transcript_text(outcome)?;

    let session = state.sessions.get_or_create(&session_id);
    let start = Instant::now();
    let response = state.chat.respond_in(&session, &transcript, None).await?;
    record_stage_latency("chat", start.elapsed());

    let start = Instant::now();
    let localized = state.localizer.localize(&response, &language).await?;
    record_stage_latency("localize", start.elapsed());

    Ok(Json(VoiceResponse {
        transcript,
        response,
        translated_text: localized.translated_text,
        language: localized.language_used.code().to_string(),
        audio: localized.audio.map(|audio| BASE64.encode(audio.data)),
        format: AudioFormat::Mp3.extension(),
        session_id,
    }))
}

// Sessions

/// GET /api/sessions/:id
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::NotFound("Session not found".to_string()))?;
    let view = SessionView::of(&*session.lock().await);
    Ok(Json(view))
}

/// DELETE /api/sessions/:id
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

// Service info

/// GET /api/languages
async fn languages() -> Json<serde_json::Value> {
    let languages: Vec<_> = Language::all()
        .iter()
        .map(|lang| serde_json::json!({ "code": lang.code(), "name": lang.name() }))
        .collect();

    Json(serde_json::json!({
        "default": Language::PIVOT.code(),
        "languages": languages
    }))
}

/// GET /api/health
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": service::NAME,
        "version": service::VERSION
    }))
}
