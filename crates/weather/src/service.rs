//! Weather lookup service

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use agrobot_core::{with_timeout, Location, Result, Service, WeatherProvider};

use crate::advisory::{synthesize, WeatherSnapshot};

/// `/api/weather` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Advisory sentence suitable for chat grounding
    pub context: String,
    pub details: WeatherSnapshot,
}

/// Fetches conditions and turns them into a summary
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    timeout: Duration,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn summary(&self, location: &Location) -> Result<WeatherSummary> {
        let payload = with_timeout(
            Service::Weather,
            self.timeout,
            self.provider.current_conditions(location),
        )
        .await?;

        let (details, advisory) = synthesize(&payload);
        tracing::info!(
            provider = self.provider.name(),
            location = %details.location,
            clauses = advisory.clauses().len(),
            "Weather context ready"
        );

        Ok(WeatherSummary {
            context: advisory.into_text(),
            details,
        })
    }
}
