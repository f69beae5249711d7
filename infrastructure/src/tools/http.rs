//! Shared HTTP plumbing for data-provider tools.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tripwise_domain::ToolError;
use tripwise_domain::util::truncate_str;

/// Errors raised while talking to a data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no data found for {0}")]
    NotFound(String),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl From<ProviderError> for ToolError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Http(e) if e.is_timeout() => {
                ToolError::timeout("data provider request").with_details(e.to_string())
            }
            ProviderError::Http(e) => {
                ToolError::execution_failed(format!("data provider unreachable: {}", e))
            }
            ProviderError::Status { status, body } => {
                ToolError::upstream(format!("data provider returned HTTP {}", status))
                    .with_details(body)
            }
            ProviderError::NotFound(what) => ToolError::not_found(what),
            ProviderError::Decode(message) => ToolError::execution_failed(message),
        }
    }
}

/// HTTP client shared by every provider tool.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
}

impl ProviderClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` with `query` and decode the body as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        debug!(url, "Provider request");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_str(&body, 200).to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_codes() {
        let not_found: ToolError = ProviderError::NotFound("currency ZZZ".to_string()).into();
        assert_eq!(not_found.code, "NOT_FOUND");
        assert!(not_found.message.contains("currency ZZZ"));

        let upstream: ToolError = ProviderError::Status {
            status: 503,
            body: "busy".to_string(),
        }
        .into();
        assert_eq!(upstream.code, "UPSTREAM");
        assert_eq!(upstream.details.as_deref(), Some("busy"));

        let decode: ToolError = ProviderError::Decode("missing field".to_string()).into();
        assert_eq!(decode.code, "EXECUTION_FAILED");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(92.4567, 2), 92.46);
        assert_eq!(round_to(11.96, 1), 12.0);
    }
}
