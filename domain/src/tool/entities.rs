//! Tool domain entities

use crate::core::error::DomainError;
use crate::validation::rules::ValidationDomain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The closed set of tools the assistant can run.
///
/// Variant order is the fixed enumeration order used when scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolName {
    #[serde(rename = "get_weather")]
    Weather,
    #[serde(rename = "get_country_info")]
    Country,
    #[serde(rename = "convert_currency")]
    Currency,
    #[serde(rename = "search_flights")]
    Flights,
    #[serde(rename = "search_hotels")]
    Hotels,
    #[serde(rename = "search_places")]
    Places,
    #[serde(rename = "analyze_trip_context")]
    TripContext,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::Weather,
        ToolName::Country,
        ToolName::Currency,
        ToolName::Flights,
        ToolName::Hotels,
        ToolName::Places,
        ToolName::TripContext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Weather => "get_weather",
            ToolName::Country => "get_country_info",
            ToolName::Currency => "convert_currency",
            ToolName::Flights => "search_flights",
            ToolName::Hotels => "search_hotels",
            ToolName::Places => "search_places",
            ToolName::TripContext => "analyze_trip_context",
        }
    }

    /// The validation domain whose hallucination rules apply to this tool's
    /// output, if any.
    pub fn validation_domain(&self) -> Option<ValidationDomain> {
        match self {
            ToolName::Weather => Some(ValidationDomain::Weather),
            ToolName::Flights => Some(ValidationDomain::Flights),
            ToolName::Currency => Some(ValidationDomain::Currency),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DomainError::UnknownTool(s.to_string()))
    }
}

/// Definition of a tool in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: ToolName,
    /// Human-readable description
    pub description: String,
    /// Input shape
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Type hint: "string", "number" or "boolean"
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: ToolName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// The catalog of registered tools, kept in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<ToolName, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a definition; a later registration under the same name
    /// replaces the earlier one.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name, tool);
        self
    }

    pub fn contains(&self, name: ToolName) -> bool {
        self.tools.contains_key(&name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = ToolName> + '_ {
        self.tools.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments.
///
/// Arguments live in a `BTreeMap` so two calls with the same arguments
/// compare equal regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: ToolName,
    pub arguments: BTreeMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool: ToolName) -> Self {
        Self {
            tool,
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Arguments rendered as a JSON object, for prompts and logs.
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
