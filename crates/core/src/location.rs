//! Weather lookup location

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where to look up current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl Location {
    /// Resolve from loosely supplied query parts.
    ///
    /// A non-blank city wins over coordinates; coordinates need both halves.
    pub fn resolve(lat: Option<f64>, lon: Option<f64>, city: Option<&str>) -> Result<Self> {
        if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
            return Ok(Self::City(city.to_string()));
        }
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Self::Coordinates { lat, lon }),
            _ => Err(Error::validation(
                "Latitude and longitude or a city name are required.",
            )),
        }
    }

    /// Query parameters understood by OpenWeather-style providers
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Coordinates { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
            Self::City(city) => vec![("q", city.clone())],
        }
    }
}
