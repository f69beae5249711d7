//! Tool domain traits
//!
//! Contains pure domain logic traits for tool argument validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// Validates a call against its definition without any I/O.
pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                None => {}
                Some(value) => {
                    let type_ok = match param.param_type.as_str() {
                        "number" => value.is_number(),
                        "boolean" => value.is_boolean(),
                        _ => value.as_str().is_some_and(|s| !s.trim().is_empty()),
                    };
                    if !type_ok {
                        return Err(format!(
                            "Parameter '{}' for tool '{}' must be a non-empty {}",
                            param.name, definition.name, param.param_type
                        ));
                    }
                }
            }
        }

        for arg_name in call.arguments.keys() {
            if definition.parameter(arg_name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}
