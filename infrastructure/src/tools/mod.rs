//! Travel data tools
//!
//! Each tool implements the domain [`Tool`](tripwise_domain::Tool) trait and
//! is registered in a [`ToolRegistry`], which the orchestration loop drives
//! through [`ToolExecutorPort`](tripwise_application::ToolExecutorPort).
//!
//! ## Providers
//!
//! | Tool | Source |
//! |------|--------|
//! | `get_weather` | Open-Meteo geocoding + forecast |
//! | `get_country_info` | REST Countries |
//! | `convert_currency` | open.er-api.com |
//! | `search_flights` | none (booking links only) |
//! | `search_hotels`, `search_places` | Nominatim + Overpass |
//! | `analyze_trip_context` | none (local extraction) |
//!
//! Network-backed tools share one [`ProviderClient`] and one
//! [`ResponseCache`].

pub mod cache;
pub mod context;
pub mod country;
pub mod currency;
pub mod flights;
pub mod hotels;
pub mod http;
pub mod osm;
pub mod places;
pub mod weather;

mod registry;

pub use cache::{CachedTool, ResponseCache};
pub use http::{ProviderClient, ProviderError};
pub use registry::ToolRegistry;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tripwise_domain::ToolSpec;

use crate::config::FileToolsConfig;

/// Definitions of every tool, in catalogue order.
pub fn tool_catalog() -> ToolSpec {
    ToolSpec::new()
        .register(weather::definition())
        .register(country::definition())
        .register(currency::definition())
        .register(flights::definition())
        .register(hotels::definition())
        .register(places::definition())
        .register(context::definition())
}

/// Build the registry with every tool. `timeout` bounds each provider
/// HTTP request.
pub fn build_registry(
    config: &FileToolsConfig,
    timeout: Duration,
) -> Result<ToolRegistry, ProviderError> {
    let client = ProviderClient::new(&config.user_agent, timeout)?;
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(
        config.cache_ttl_seconds,
    )));

    let registry = ToolRegistry::new()
        .register(CachedTool::new(
            weather::WeatherTool::new(client.clone()),
            cache.clone(),
        ))
        .register(CachedTool::new(
            country::CountryTool::new(client.clone()),
            cache.clone(),
        ))
        .register(CachedTool::new(
            currency::CurrencyTool::new(client.clone()),
            cache.clone(),
        ))
        .register(flights::FlightsTool::new())
        .register(CachedTool::new(
            hotels::HotelsTool::new(client.clone()),
            cache.clone(),
        ))
        .register(CachedTool::new(places::PlacesTool::new(client), cache))
        .register(context::TripContextTool::new());

    info!(
        tools = registry.tool_names().len(),
        cache_ttl_seconds = config.cache_ttl_seconds,
        "Tool registry ready"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripwise_application::ToolExecutorPort;
    use tripwise_domain::ToolName;

    #[test]
    fn test_catalog_covers_every_tool() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), ToolName::ALL.len());
        for tool in ToolName::ALL {
            assert!(catalog.contains(tool), "missing {}", tool);
        }
    }

    #[test]
    fn test_build_registry() {
        let registry = build_registry(&FileToolsConfig::default(), Duration::from_secs(5)).unwrap();
        assert_eq!(registry.tool_names(), ToolName::ALL.to_vec());
        assert!(registry.has_tool(ToolName::Flights));
        assert_eq!(registry.tool_spec().len(), ToolName::ALL.len());
    }
}
