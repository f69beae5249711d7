//! convert_currency: latest rates from the open ExchangeRate-API endpoint.

use async_trait::async_trait;
use serde_json::{Value, json};
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolName, ToolParameter};

use super::http::{ProviderClient, ProviderError, round_to};

const RATES_URL: &str = "https://open.er-api.com/v6/latest/";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::Currency,
        "Convert an amount between two ISO 4217 currencies at the latest rate.",
    )
    .with_parameter(ToolParameter::new("amount", "Amount to convert", true).with_type("number"))
    .with_parameter(ToolParameter::new("from", "Source currency code, e.g. USD", true))
    .with_parameter(ToolParameter::new("to", "Target currency code, e.g. EUR", true))
}

fn currency_code(call: &ToolCall, name: &str) -> Result<String, ToolError> {
    let code = call
        .require_string(name)
        .map_err(ToolError::invalid_argument)?
        .trim()
        .to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ToolError::invalid_argument(format!(
            "'{}' is not a three-letter currency code",
            code
        )));
    }
    Ok(code)
}

/// Tool payload from a rates table keyed by the source currency.
pub fn parse_conversion(body: &Value, amount: f64, from: &str, to: &str) -> Result<Value, ProviderError> {
    if body.get("result").and_then(|v| v.as_str()) != Some("success") {
        return Err(ProviderError::NotFound(format!("exchange rates for {}", from)));
    }
    let rate = body
        .get("rates")
        .and_then(|rates| rates.get(to))
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ProviderError::NotFound(format!("exchange rate {} to {}", from, to)))?;

    Ok(json!({
        "amount": amount,
        "from": from,
        "to": to,
        "rate": rate,
        "converted_amount": round_to(amount * rate, 2),
    }))
}

pub struct CurrencyTool {
    client: ProviderClient,
    definition: ToolDefinition,
}

impl CurrencyTool {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            definition: definition(),
        }
    }
}

#[async_trait]
impl Tool for CurrencyTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let amount = call
            .get_f64("amount")
            .ok_or_else(|| ToolError::invalid_argument("amount must be a number"))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ToolError::invalid_argument("amount must be a non-negative number"));
        }
        let from = currency_code(call, "from")?;
        let to = currency_code(call, "to")?;

        if from == to {
            return Ok(json!({
                "amount": amount,
                "from": from,
                "to": to,
                "rate": 1.0,
                "converted_amount": round_to(amount, 2),
            }));
        }

        let body = self
            .client
            .get_json(&format!("{}{}", RATES_URL, from), &[])
            .await?;
        Ok(parse_conversion(&body, amount, &from, &to)?)
    }
}
