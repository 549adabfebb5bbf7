//! Weather data traits

use crate::{Location, Result};
use async_trait::async_trait;

/// Current-conditions provider
///
/// Returns the provider's raw JSON payload; turning it into a snapshot and
/// advisory is a pure step done by the caller.
///
/// Implementations:
/// - `OpenWeatherClient` - OpenWeather current weather API
#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    /// Fetch current conditions in metric units
    async fn current_conditions(&self, location: &Location) -> Result<serde_json::Value>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
