//! OpenWeather current-conditions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use agrobot_config::WeatherSettings;
use agrobot_core::{Location, WeatherProvider};

use crate::WeatherError;

/// Unit system requested from the provider. Advisory thresholds and the
/// km/h conversion assume Celsius and metres per second.
const UNITS: &str = "metric";

/// OpenWeather configuration
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl OpenWeatherConfig {
    pub fn from_settings(settings: &WeatherSettings, timeout: Duration) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            timeout,
        }
    }
}

pub struct OpenWeatherClient {
    client: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Fetch the raw payload for `location`
    pub async fn fetch(&self, location: &Location) -> Result<Value, WeatherError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            WeatherError::Configuration("OPENWEATHER_API_KEY is missing. Add it to your environment.".to_string())
        })?;

        let mut query = location.query_pairs();
        query.push(("appid", api_key.to_string()));
        query.push(("units", UNITS.to_string()));

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| WeatherError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api(body));
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_conditions(&self, location: &Location) -> agrobot_core::Result<Value> {
        Ok(self.fetch(location).await?)
    }

    fn name(&self) -> &str {
        "openweather"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrobot_core::{Error, Service};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenWeatherClient {
        OpenWeatherClient::new(OpenWeatherConfig {
            endpoint: server.uri(),
            api_key: api_key.map(String::from),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_city_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Warangal"))
            .and(query_param("appid", "owm-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Warangal"})))
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_for(&server, Some("owm-key"))
            .current_conditions(&Location::City("Warangal".into()))
            .await
            .unwrap();
        assert_eq!(payload["name"], "Warangal");
    }

    #[tokio::test]
    async fn test_coordinate_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("lat", "17.4"))
            .and(query_param("lon", "78.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, Some("k"))
            .fetch(&Location::Coordinates { lat: 17.4, lon: 78.5 })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("k"))
            .current_conditions(&Location::City("Atlantis".into()))
            .await
            .unwrap_err();

        assert_eq!(err.service(), Some(Service::Weather));
        assert!(err.to_string().starts_with("Weather API error: "));
        assert!(err.to_string().contains("city not found"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let server = MockServer::start().await;
        let err = client_for(&server, None)
            .current_conditions(&Location::City("Pune".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.starts_with("OPENWEATHER_API_KEY")));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream() {
        let client = OpenWeatherClient::new(OpenWeatherConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let err = client
            .current_conditions(&Location::City("Pune".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Upstream { service: Service::Weather, .. }));
        assert!(err.to_string().starts_with("Connection to weather service failed"));
    }
}
