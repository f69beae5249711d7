//! search_flights: booking-site links for a route.
//!
//! No fare data source is queried. The payload carries the route and
//! search links only, so an answer has nothing to quote as a price, date
//! or carrier.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

const TIPS: &[&str] = &[
    "Compare several booking sites before you buy; fares for the same seat often differ.",
    "Flexible travel days and nearby airports usually widen the choice.",
    "Check baggage allowances before booking, since they vary by ticket type.",
];

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Flights,
        "Booking-site search links for a route. Returns no prices, schedules or airlines.",
    )
    .with_parameter(ToolParameter::new("origin", "Departure city", true))
    .with_parameter(ToolParameter::new("destination", "Arrival city", true))
    .with_parameter(
        ToolParameter::new(
            "origin_inferred",
            "Whether the origin was assumed rather than stated by the user",
            false,
        )
        .with_type("boolean"),
    )
}

fn slug(city: &str) -> String {
    city.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Search links for `origin` → `destination`, one per provider.
pub fn booking_links(origin: &str, destination: &str) -> Vec<(&'static str, String)> {
    let google = Url::parse_with_params(
        "https://www.google.com/travel/flights",
        &[("q", format!("Flights from {} to {}", origin, destination))],
    )
    .map(String::from)
    .unwrap_or_else(|_| "https://www.google.com/travel/flights".to_string());

    vec![
        ("Google Flights", google),
        (
            "Skyscanner",
            format!(
                "https://www.skyscanner.net/transport/flights/{}/{}/",
                slug(origin),
                slug(destination)
            ),
        ),
        (
            "Kayak",
            format!(
                "https://www.kayak.com/flights/{}-{}",
                slug(origin),
                slug(destination)
            ),
        ),
    ]
}

pub struct FlightsTool {
    definition: ToolDefinition,
}

impl FlightsTool {
    pub fn new() -> Self {
        Self {
            definition: definition(),
        }
    }
}

impl Default for FlightsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlightsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let origin = call
            .require_string("origin")
            .map_err(ToolError::invalid_argument)?
            .trim();
        let destination = call
            .require_string("destination")
            .map_err(ToolError::invalid_argument)?
            .trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(ToolError::invalid_argument("origin and destination must not be empty"));
        }
        if origin.eq_ignore_ascii_case(destination) {
            return Err(ToolError::invalid_argument(
                "origin and destination are the same city",
            ));
        }

        let links: Vec<Value> = booking_links(origin, destination)
            .into_iter()
            .map(|(provider, url)| json!({"provider": provider, "url": url}))
            .collect();

        Ok(json!({
            "origin": origin,
            "destination": destination,
            "origin_inferred": call.get_bool("origin_inferred").unwrap_or(false),
            "booking_links": links,
            "tips": TIPS,
        }))
    }
}
