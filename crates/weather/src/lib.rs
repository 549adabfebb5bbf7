//! Weather grounding for farming answers
//!
//! Features:
//! - OpenWeather current-conditions client
//! - Pure snapshot extraction and threshold-based advisory text
//! - Bounded lookup service producing the `/api/weather` summary

pub mod advisory;
pub mod client;
pub mod service;

pub use advisory::{synthesize, Advisory, AdvisoryClause, SoilMoistureHint, WeatherSnapshot};
pub use client::{OpenWeatherClient, OpenWeatherConfig};
pub use service::{WeatherService, WeatherSummary};

use agrobot_core::Service;
use thiserror::Error;

/// Weather provider errors
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather API error: {0}")]
    Api(String),

    #[error("Connection to weather service failed: {0}")]
    Connection(String),

    #[error("Invalid weather response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Configuration(String),
}

impl From<WeatherError> for agrobot_core::Error {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Configuration(message) => agrobot_core::Error::Configuration(message),
            other => agrobot_core::Error::upstream(Service::Weather, other.to_string()),
        }
    }
}
