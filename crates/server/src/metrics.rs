//! Prometheus metrics
//!
//! Series:
//! - `agrobot_http_requests_total{endpoint, status}`
//! - `agrobot_http_request_duration_seconds{endpoint}`
//! - `agrobot_stage_duration_seconds{stage}`
//! - `agrobot_fallbacks_total{kind}`, recorded by the localization stage

use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed in this process.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics recorder not installed");
            None
        }
    }
}

pub fn record_request(endpoint: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        "agrobot_http_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("agrobot_http_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record one pipeline stage (`chat`, `transcribe`, `localize`, ...)
pub fn record_stage_latency(stage: &'static str, elapsed: Duration) {
    metrics::histogram!("agrobot_stage_duration_seconds", "stage" => stage).record(elapsed.as_secs_f64());
}

/// Middleware recording request count and latency by route template
pub async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    record_request(&endpoint, response.status().as_u16(), start.elapsed());
    response
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
