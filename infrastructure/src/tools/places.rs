//! search_places: attractions, museums, viewpoints, restaurants and parks.

use async_trait::async_trait;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

use super::http::{ProviderClient, ProviderError};
use super::osm;

type Filters = &'static [(&'static str, &'static [&'static str])];

const DEFAULT_FILTERS: Filters = &[("tourism", &["attraction", "museum", "viewpoint"])];

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Places,
        "Named points of interest near a city centre, optionally narrowed to one category.",
    )
    .with_parameter(ToolParameter::new("location", "City or neighbourhood", true))
    .with_parameter(ToolParameter::new(
        "category",
        "One of museum, viewpoint, restaurant, park",
        false,
    ))
}

/// OpenStreetMap tag filters for a category hint. Unknown categories fall
/// back to general attractions.
pub fn filters_for(category: Option<&str>) -> Filters {
    match category.map(str::to_ascii_lowercase).as_deref() {
        Some("museum") => &[("tourism", &["museum", "gallery"])],
        Some("viewpoint") => &[("tourism", &["viewpoint"])],
        Some("restaurant") => &[("amenity", &["restaurant", "cafe"])],
        Some("park") => &[("leisure", &["park", "garden"])],
        _ => DEFAULT_FILTERS,
    }
}

pub struct PlacesTool {
    client: ProviderClient,
    definition: ToolDefinition,
}

impl PlacesTool {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            definition: definition(),
        }
    }
}

#[async_trait]
impl Tool for PlacesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let location = call
            .require_string("location")
            .map_err(ToolError::invalid_argument)?;
        let category = call.get_string("category");
        let places = osm::search_nearby(&self.client, location, filters_for(category)).await?;
        if places.is_empty() {
            return Err(ProviderError::NotFound(format!("places near {}", location)).into());
        }

        let mut payload = json!({
            "location": location,
            "count": places.len(),
            "places": places,
        });
        if let Some(category) = category {
            payload["category"] = json!(category);
        }
        Ok(payload)
    }
}
