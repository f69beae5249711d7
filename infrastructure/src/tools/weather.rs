//! get_weather: current conditions from Open-Meteo.
//!
//! Two requests: the geocoding API resolves the place name, then the
//! forecast API returns the `current` block for those coordinates.

use async_trait::async_trait;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

use super::http::{ProviderClient, ProviderError, round_to};

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Weather,
        "Current weather for a city: temperature (°C), condition, humidity and wind.",
    )
    .with_parameter(ToolParameter::new("location", "City or place name", true))
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// First result of an Open-Meteo geocoding response.
pub fn parse_geocoding(body: &Value, query: &str) -> Result<GeoPoint, ProviderError> {
    let first = body
        .get("results")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .ok_or_else(|| ProviderError::NotFound(format!("location '{}'", query)))?;

    let coordinate = |field: &str| {
        first
            .get(field)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ProviderError::Decode(format!("geocoding result without {}", field)))
    };

    Ok(GeoPoint {
        name: first
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(query)
            .to_string(),
        country: first
            .get("country")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        latitude: coordinate("latitude")?,
        longitude: coordinate("longitude")?,
    })
}

/// Condition text for a WMO weather interpretation code.
pub fn condition_for_code(code: u64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// Tool payload from the `current` block of a forecast response.
pub fn parse_current(body: &Value, place: &GeoPoint) -> Result<Value, ProviderError> {
    let current = body
        .get("current")
        .ok_or_else(|| ProviderError::Decode("forecast without current conditions".to_string()))?;
    let number = |field: &str| current.get(field).and_then(|v| v.as_f64());

    let temperature = number("temperature_2m")
        .ok_or_else(|| ProviderError::Decode("forecast without temperature".to_string()))?;
    let code = current
        .get("weather_code")
        .and_then(|v| v.as_u64())
        .unwrap_or(u64::MAX);

    let mut payload = json!({
        "location": place.name,
        "temperature": round_to(temperature, 1),
        "condition": condition_for_code(code),
    });
    if let Some(country) = &place.country {
        payload["country"] = json!(country);
    }
    if let Some(feels_like) = number("apparent_temperature") {
        payload["feels_like"] = json!(round_to(feels_like, 1));
    }
    if let Some(humidity) = number("relative_humidity_2m") {
        payload["humidity"] = json!(humidity.round());
    }
    if let Some(wind) = number("wind_speed_10m") {
        payload["wind_kph"] = json!(round_to(wind, 1));
    }
    Ok(payload)
}

/// Weather tool backed by Open-Meteo
pub struct WeatherTool {
    client: ProviderClient,
    definition: ToolDefinition,
}

impl WeatherTool {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            definition: definition(),
        }
    }

    async fn lookup(&self, location: &str) -> Result<Value, ProviderError> {
        let geo = self
            .client
            .get_json(
                GEOCODING_URL,
                &[
                    ("name", location.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;
        let place = parse_geocoding(&geo, location)?;

        let forecast = self
            .client
            .get_json(
                FORECAST_URL,
                &[
                    ("latitude", place.latitude.to_string()),
                    ("longitude", place.longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                ],
            )
            .await?;
        parse_current(&forecast, &place)
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let location = call
            .require_string("location")
            .map_err(ToolError::invalid_argument)?;
        Ok(self.lookup(location).await?)
    }
}
