//! get_country_info: country facts from REST Countries.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

use super::http::{ProviderClient, ProviderError};

const BASE_URL: &str = "https://restcountries.com/v3.1/name/";
const FIELDS: &str = "name,capital,region,population,currencies,languages";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Country,
        "Country facts: capital, region, population, currencies and languages.",
    )
    .with_parameter(ToolParameter::new("country", "Country name", true))
}

fn lookup_url(country: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(BASE_URL).map_err(|e| ProviderError::Decode(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::Decode("country lookup URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .push(country);
    Ok(url)
}

/// Tool payload from a REST Countries name search. An exact common-name
/// match wins over the first partial match.
pub fn parse_country(body: &Value, query: &str) -> Result<Value, ProviderError> {
    let entries = body
        .as_array()
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| ProviderError::NotFound(format!("country '{}'", query)))?;

    let common_name = |entry: &Value| {
        entry
            .pointer("/name/common")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    let entry = entries
        .iter()
        .find(|entry| common_name(*entry).is_some_and(|name| name.eq_ignore_ascii_case(query)))
        .unwrap_or(&entries[0]);

    let name = common_name(entry)
        .ok_or_else(|| ProviderError::Decode("country entry without a name".to_string()))?;
    let capital = entry
        .get("capital")
        .and_then(|v| v.as_array())
        .and_then(|c| c.first())
        .and_then(|v| v.as_str());
    let mut currencies: Vec<&str> = entry
        .get("currencies")
        .and_then(|v| v.as_object())
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    currencies.sort_unstable();
    let languages: Vec<&str> = entry
        .get("languages")
        .and_then(|v| v.as_object())
        .map(|map| map.values().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    Ok(json!({
        "name": name,
        "capital": capital,
        "region": entry.get("region").and_then(|v| v.as_str()),
        "population": entry.get("population").and_then(|v| v.as_u64()),
        "currencies": currencies,
        "languages": languages,
    }))
}

pub struct CountryTool {
    client: ProviderClient,
    definition: ToolDefinition,
}

impl CountryTool {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            definition: definition(),
        }
    }
}

#[async_trait]
impl Tool for CountryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let country = call
            .require_string("country")
            .map_err(ToolError::invalid_argument)?;
        let url = lookup_url(country)?;
        let body = match self
            .client
            .get_json(url.as_str(), &[("fields", FIELDS.to_string())])
            .await
        {
            Err(ProviderError::NotFound(_)) => {
                return Err(ProviderError::NotFound(format!("country '{}'", country)).into());
            }
            other => other?,
        };
        Ok(parse_country(&body, country)?)
    }
}
