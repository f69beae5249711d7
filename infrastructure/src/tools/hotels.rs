//! search_hotels: accommodation near a city centre from OpenStreetMap.

use async_trait::async_trait;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

use super::http::{ProviderClient, ProviderError};
use super::osm;

const FILTERS: &[(&str, &[&str])] =
    &[("tourism", &["hotel", "guest_house", "hostel", "apartment"])];

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Hotels,
        "Named hotels, guest houses and hostels near a city centre. No prices or availability.",
    )
    .with_parameter(ToolParameter::new("location", "City or neighbourhood", true))
}

pub struct HotelsTool {
    client: ProviderClient,
    definition: ToolDefinition,
}

impl HotelsTool {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            definition: definition(),
        }
    }
}

#[async_trait]
impl Tool for HotelsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let location = call
            .require_string("location")
            .map_err(ToolError::invalid_argument)?;
        let hotels = osm::search_nearby(&self.client, location, FILTERS).await?;
        if hotels.is_empty() {
            return Err(ProviderError::NotFound(format!("accommodation near {}", location)).into());
        }
        Ok(json!({
            "location": location,
            "count": hotels.len(),
            "hotels": hotels,
        }))
    }
}
