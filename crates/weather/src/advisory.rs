//! Weather advisory synthesis
//!
//! Pure transformation from a raw OpenWeather payload to a
//! [`WeatherSnapshot`] and its [`Advisory`]. Missing provider fields default
//! to zero or an empty string; extraction never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentence used when no advisory clause triggers
pub const STABLE_ADVICE: &str = "conditions look stable, follow your regular schedule";

/// Placeholder when the provider omits the place name
const UNKNOWN_PLACE: &str = "your area";

/// Categorical soil-moisture estimate
///
/// Serializes as its sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoilMoistureHint {
    #[serde(rename = "Topsoil is moist from recent rain")]
    RecentlyMoist,
    #[serde(rename = "Soil dries quickly in these hot, dry conditions")]
    DriesQuickly,
    #[serde(rename = "Soil moisture is moderate, check before irrigating")]
    Moderate,
}

impl SoilMoistureHint {
    /// First match wins: rain, then hot and dry, then moderate
    pub fn classify(temperature: f64, humidity: f64, rain_mm: f64) -> Self {
        if rain_mm > 0.0 {
            Self::RecentlyMoist
        } else if temperature > 32.0 && humidity < 40.0 {
            Self::DriesQuickly
        } else {
            Self::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecentlyMoist => "Topsoil is moist from recent rain",
            Self::DriesQuickly => "Soil dries quickly in these hot, dry conditions",
            Self::Moderate => "Soil moisture is moderate, check before irrigating",
        }
    }
}

impl fmt::Display for SoilMoistureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independently triggered piece of farming advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryClause {
    /// temperature < 18°C
    Cool,
    /// temperature > 32°C
    HeatStress,
    /// humidity > 80%
    FungalPressure,
    /// humidity < 30%
    DryAir,
    /// wind > 30 km/h
    StrongWind,
    /// precipitation > 5 mm
    RecentRain,
}

impl AdvisoryClause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cool => "conditions are cool, consider monitoring cold-sensitive crops",
            Self::HeatStress => "heat stress likely, irrigate during early morning or evening",
            Self::FungalPressure => "fungal pressure is high, keep foliage dry where possible",
            Self::DryAir => "air is dry, mulching helps retain soil moisture",
            Self::StrongWind => "strong winds expected, protect young plants and tunnels",
            Self::RecentRain => "recent rain detected, delay irrigation to avoid waterlogging",
        }
    }

    /// Every clause whose threshold the snapshot crosses, in table order
    pub fn evaluate(snapshot: &WeatherSnapshot) -> Vec<AdvisoryClause> {
        let rules = [
            (snapshot.temperature < 18.0, Self::Cool),
            (snapshot.temperature > 32.0, Self::HeatStress),
            (snapshot.humidity > 80.0, Self::FungalPressure),
            (snapshot.humidity < 30.0, Self::DryAir),
            (snapshot.wind_speed > 30.0, Self::StrongWind),
            (snapshot.rain_mm > 5.0, Self::RecentRain),
        ];

        rules
            .into_iter()
            .filter_map(|(triggered, clause)| triggered.then_some(clause))
            .collect()
    }
}

/// Current conditions in farmer-facing units
///
/// Temperatures in °C and wind in km/h, both rounded to one decimal.
/// The soil-moisture hint is always derived from the other fields, including
/// when a snapshot is deserialized from client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotFields")]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub description: String,
    pub rain_mm: f64,
    pub soil_moisture_hint: SoilMoistureHint,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFields {
    location: String,
    temperature: f64,
    humidity: f64,
    feels_like: f64,
    pressure: f64,
    wind_speed: f64,
    description: String,
    rain_mm: f64,
}

impl From<SnapshotFields> for WeatherSnapshot {
    fn from(fields: SnapshotFields) -> Self {
        Self {
            soil_moisture_hint: SoilMoistureHint::classify(fields.temperature, fields.humidity, fields.rain_mm),
            location: fields.location,
            temperature: fields.temperature,
            humidity: fields.humidity,
            feels_like: fields.feels_like,
            pressure: fields.pressure,
            wind_speed: fields.wind_speed,
            description: fields.description,
            rain_mm: fields.rain_mm,
        }
    }
}

impl WeatherSnapshot {
    /// Extract a snapshot from an OpenWeather current-weather payload
    pub fn from_provider(payload: &Value) -> Self {
        let number = |pointer: &str| payload.pointer(pointer).and_then(Value::as_f64).unwrap_or(0.0);

        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PLACE);
        let country = payload
            .pointer("/sys/country")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let location = format!("{}, {}", name, country)
            .trim_matches(|c| c == ',' || c == ' ')
            .to_string();

        // Zero readings count as absent, so an empty 1h window defers to 3h
        let rain = ["/rain/1h", "/rain/3h"]
            .into_iter()
            .map(number)
            .find(|mm| *mm != 0.0)
            .unwrap_or(0.0);

        let description = payload
            .pointer("/weather/0/description")
            .and_then(Value::as_str)
            .map(capitalize)
            .unwrap_or_default();

        SnapshotFields {
            location,
            temperature: round1(number("/main/temp")),
            humidity: number("/main/humidity"),
            feels_like: round1(number("/main/feels_like")),
            pressure: number("/main/pressure"),
            wind_speed: round1(number("/wind/speed") * 3.6),
            description,
            rain_mm: round1(rain),
        }
        .into()
    }

    pub fn advisory(&self) -> Advisory {
        Advisory::for_snapshot(self)
    }
}

/// Advice derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    clauses: Vec<AdvisoryClause>,
    text: String,
}

impl Advisory {
    pub fn for_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let clauses = AdvisoryClause::evaluate(snapshot);
        let action = if clauses.is_empty() {
            STABLE_ADVICE.to_string()
        } else {
            clauses.iter().map(AdvisoryClause::as_str).collect::<Vec<_>>().join("; ")
        };

        let text = format!(
            "Local weather for {}: {}, {}°C, humidity {}%, wind {} km/h. Soil moisture hint: {}. Action: {}.",
            snapshot.location,
            snapshot.description,
            snapshot.temperature,
            snapshot.humidity,
            snapshot.wind_speed,
            snapshot.soil_moisture_hint,
            action
        );
        Self { clauses, text }
    }

    pub fn clauses(&self) -> &[AdvisoryClause] {
        &self.clauses
    }

    /// Full context sentence, as embedded in chat prompts
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extract and advise in one step
pub fn synthesize(payload: &Value) -> (WeatherSnapshot, Advisory) {
    let snapshot = WeatherSnapshot::from_provider(payload);
    let advisory = snapshot.advisory();
    (snapshot, advisory)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
