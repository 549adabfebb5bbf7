//! End-to-end tests of the HTTP API over in-process mock backends

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use agrobot_config::Settings;
use agrobot_core::{
    AudioInput, Error, GenerateRequest, GenerateResponse, Language, LanguageModel, Location, Result, Service,
    SpeechToText, SynthesizedAudio, TextToSpeech, TranscriptionOptions, Translator, WeatherProvider,
};
use agrobot_server::{create_router, AppState, Backends};
use agrobot_weather::{OpenWeatherClient, OpenWeatherConfig};

const BOUNDARY: &str = "agrobot-test-boundary";

#[derive(Default)]
struct RecordingLlm {
    requests: Mutex<Vec<GenerateRequest>>,
}

impl RecordingLlm {
    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .and_then(|r| r.last_text())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl LanguageModel for RecordingLlm {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let has_image = request.messages.iter().any(|m| m.image.is_some());
        self.requests.lock().unwrap().push(request);
        if has_image {
            Ok(GenerateResponse::text("Tomato leaf with early blight, mild. Spray neem oil."))
        } else {
            Ok(GenerateResponse::text("  Hello! How can I help with your farm today?  "))
        }
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

#[derive(Default)]
struct FixedStt {
    calls: Mutex<Vec<TranscriptionOptions>>,
}

#[async_trait]
impl SpeechToText for FixedStt {
    async fn transcribe(&self, _audio: &AudioInput, options: &TranscriptionOptions) -> Result<String> {
        self.calls.lock().unwrap().push(options.clone());
        Ok(" मेरी फसल में कीड़े हैं ".to_string())
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

struct FixedTts;

#[async_trait]
impl TextToSpeech for FixedTts {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<SynthesizedAudio> {
        Ok(SynthesizedAudio::mp3(vec![0xFF, 0xF3, 0x44]))
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

struct ScriptedTranslator {
    fail: bool,
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(&self, text: &str, _from: Language, to: Language) -> Result<String> {
        if self.fail {
            return Err(Error::upstream(Service::Translation, "translation quota exceeded"));
        }
        Ok(format!("[{}] {}", to.code(), text))
    }

    fn supports_pair(&self, _from: Language, _to: Language) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct FixedWeather;

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn current_conditions(&self, location: &Location) -> Result<Value> {
        match location {
            Location::City(city) if city == "Atlantis" => {
                Err(Error::upstream(Service::Weather, "Weather API error: city not found"))
            }
            _ => Ok(json!({
                "name": "Nashik",
                "sys": {"country": "IN"},
                "main": {"temp": 31.0, "humidity": 45, "feels_like": 32.2, "pressure": 1008},
                "wind": {"speed": 2.5},
                "weather": [{"description": "scattered clouds"}]
            })),
        }
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Never answers within the server deadline
struct StalledLlm;

#[async_trait]
impl LanguageModel for StalledLlm {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(GenerateResponse::text("too late"))
    }

    fn model_name(&self) -> &str {
        "stalled"
    }
}

struct TestApp {
    router: Router,
    llm: Arc<RecordingLlm>,
    stt: Arc<FixedStt>,
}

fn test_app(translation_fails: bool) -> TestApp {
    let llm = Arc::new(RecordingLlm::default());
    let stt = Arc::new(FixedStt::default());
    let backends = Backends {
        llm: llm.clone(),
        stt: stt.clone(),
        tts: Arc::new(FixedTts),
        translator: Arc::new(ScriptedTranslator {
            fail: translation_fails,
        }),
        weather: Arc::new(FixedWeather),
    };
    let state = AppState::with_backends(Settings::default(), backends);
    TestApp {
        router: create_router(state),
        llm,
        stt,
    }
}

/// Router over mock backends with selected ones replaced
fn app_with(config: Settings, llm: Arc<dyn LanguageModel>, weather: Arc<dyn WeatherProvider>) -> Router {
    let backends = Backends {
        llm,
        stt: Arc::new(FixedStt::default()),
        tts: Arc::new(FixedTts),
        translator: Arc::new(ScriptedTranslator { fail: false }),
        weather,
    };
    create_router(AppState::with_backends(config, backends))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// (field name, file name, content type, data)
fn post_multipart(uri: &str, parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body
                .extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n", name).as_bytes()),
        }
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app(false);
    let (status, body) = send(&app.router, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "service": "AgroBot API", "version": "1.0.0"})
    );
}

#[tokio::test]
async fn test_chat_greeting_without_weather() {
    let app = test_app(false);
    let (status, body) = send(&app.router, post_json("/api/chat", json!({"message": "hello"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hello! How can I help with your farm today?");
    assert!(!body["session_id"].as_str().unwrap().is_empty());

    let prompt = app.llm.last_prompt();
    assert!(prompt.contains("ALWAYS respond in ENGLISH"));
    assert!(prompt.ends_with("User question: hello"));
    assert!(!prompt.contains("Current weather context"));
}

#[tokio::test]
async fn test_chat_grounded_in_weather_summary() {
    let app = test_app(false);
    let (_, weather) = send(&app.router, get("/api/weather?city=Nashik")).await;

    let (status, _) = send(
        &app.router,
        post_json(
            "/api/chat",
            json!({"message": "Should I irrigate today?", "weatherContext": weather}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prompt = app.llm.last_prompt();
    assert!(prompt.contains("Current weather context"));
    assert!(prompt.contains("Local weather for Nashik, IN"));
    assert!(prompt.contains("Soil moisture hint"));
}

#[tokio::test]
async fn test_chat_history_carried_by_session() {
    let app = test_app(false);
    let (_, first) = send(&app.router, post_json("/api/chat", json!({"message": "My name is Ravi"}))).await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let (_, second) = send(
        &app.router,
        post_json(
            "/api/chat",
            json!({"message": "What should I plant?", "session_id": session_id}),
        ),
    )
    .await;
    assert_eq!(second["session_id"], session_id.as_str());

    let requests = app.llm.requests.lock().unwrap();
    let contents: Vec<_> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0], "My name is Ravi");
    assert_eq!(contents[1], "Hello! How can I help with your farm today?");
}

#[tokio::test]
async fn test_chat_requires_message() {
    let app = test_app(false);

    let (status, body) = send(&app.router, post_json("/api/chat", json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));

    let (status, _) = send(&app.router, post_json("/api/chat", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.llm.calls(), 0);
}

#[tokio::test]
async fn test_transcribe_rejects_empty_audio() {
    let app = test_app(false);
    let request = post_multipart(
        "/api/transcribe",
        &[
            ("audio", Some("recording.webm"), Some("audio/webm"), b""),
            ("language", None, None, b"hi"),
        ],
    );

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Audio file is empty"}));
    assert!(app.stt.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transcribe_requires_audio_part() {
    let app = test_app(false);
    let request = post_multipart("/api/transcribe", &[("language", None, None, b"hi")]);

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Audio file is required"}));

    let (status, _) = send(&app.router, post_json("/api/transcribe", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transcribe_success() {
    let app = test_app(false);
    let request = post_multipart(
        "/api/transcribe",
        &[
            ("audio", Some("recording.webm"), Some("audio/webm"), b"\x1aE\xdf\xa3webm"),
            ("language", None, None, b"hi"),
        ],
    );

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "मेरी फसल में कीड़े हैं", "language": "hi"}));

    let calls = app.stt.calls.lock().unwrap();
    assert_eq!(calls[0].language, Language::Hindi);
    assert_eq!(calls[0].prompt.as_deref(), Some("Farming conversation in Hindi."));
}

#[tokio::test]
async fn test_tts_translates_and_speaks() {
    let app = test_app(false);
    let (status, body) = send(
        &app.router,
        post_json("/api/tts", json!({"text": "Water in the evening.", "language": "ta"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_text"], "[ta] Water in the evening.");
    assert_eq!(body["language"], "ta");
    assert_eq!(body["format"], "mp3");
    assert_eq!(body["audio"], "//NE");
}

#[tokio::test]
async fn test_tts_falls_back_to_pivot_on_translation_failure() {
    let app = test_app(true);
    let (status, body) = send(
        &app.router,
        post_json("/api/tts", json!({"text": "Water in the evening.", "language": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_text"], "Water in the evening.");
    assert_eq!(body["language"], "en");
    assert!(body["audio"].is_string());
}

#[tokio::test]
async fn test_tts_requires_text() {
    let app = test_app(false);
    let (status, body) = send(&app.router, post_json("/api/tts", json!({"text": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Text is required"}));
}

#[tokio::test]
async fn test_weather_summary_and_validation() {
    let app = test_app(false);

    let (status, body) = send(&app.router, get("/api/weather?lat=19.99&lon=73.79")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["location"], "Nashik, IN");
    assert_eq!(body["details"]["wind_speed"], 9.0);
    assert!(body["context"].as_str().unwrap().starts_with("Local weather for Nashik, IN"));

    let (status, body) = send(&app.router, get("/api/weather?lat=19.99")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Provide latitude/longitude or a city name"}));

    let (status, body) = send(&app.router, get("/api/weather?city=Atlantis")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Weather API error: city not found"}));
}

#[tokio::test]
async fn test_analyze_image() {
    let app = test_app(false);
    let png = b"\x89PNG\r\n\x1a\nrest-of-image";
    let request = post_multipart("/api/analyze-image", &[("image", Some("leaf.png"), Some("image/png"), png)]);

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "Tomato leaf with early blight, mild. Spray neem oil.");

    let request = post_multipart("/api/analyze-image", &[("note", None, None, b"no image")]);
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Image file is required"}));
}

#[tokio::test]
async fn test_voice_turn() {
    let app = test_app(false);
    let request = post_multipart(
        "/api/voice",
        &[
            ("audio", Some("question.webm"), Some("audio/webm"), b"\x1aE\xdf\xa3webm"),
            ("language", None, None, b"hi"),
            ("session_id", None, None, b"field-42"),
        ],
    );

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "मेरी फसल में कीड़े हैं");
    assert_eq!(body["response"], "Hello! How can I help with your farm today?");
    assert_eq!(body["translated_text"], "[hi] Hello! How can I help with your farm today?");
    assert_eq!(body["language"], "hi");
    assert_eq!(body["session_id"], "field-42");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = test_app(false);

    let (status, _) = send(&app.router, get("/api/sessions/plot-7")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app.router,
        post_json("/api/chat", json!({"message": "hello", "session_id": "plot-7"})),
    )
    .await;

    let (status, body) = send(&app.router, get("/api/sessions/plot-7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "plot-7");
    assert_eq!(body["turn_count"], 2);

    let delete = Request::delete("/api/sessions/plot-7").body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, get("/api/sessions/plot-7")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_languages() {
    let app = test_app(false);
    let (status, body) = send(&app.router, get("/api/languages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default"], "en");
    let codes: Vec<_> = body["languages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"hi") && codes.contains(&"ta"));
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = test_app(false);
    let response = app.router.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_weather_provider_is_bad_request() {
    let client = OpenWeatherClient::new(OpenWeatherConfig {
        endpoint: "http://127.0.0.1:9".to_string(),
        api_key: Some("owm-key".to_string()),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let router = app_with(Settings::default(), Arc::new(RecordingLlm::default()), Arc::new(client));

    let (status, body) = send(&router, get("/api/weather?city=Pune")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Connection to weather service failed"));
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline_renders_json_error() {
    let mut config = Settings::default();
    config.server.timeout_seconds = 1;
    config.agent.remote_timeout_secs = 60;
    let router = app_with(config, Arc::new(StalledLlm), Arc::new(FixedWeather));

    let (status, body) = send(&router, post_json("/api/chat", json!({"message": "hello"}))).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({"error": "Request timed out"}));
}
