//! Chat-completions gateway for OpenAI-compatible endpoints
//!
//! Works against api.openai.com and any server that speaks the same
//! `/chat/completions` dialect (Ollama, vLLM, LM Studio, ...).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use tripwise_application::{GatewayError, LlmGateway};
use tripwise_domain::util::truncate_str;
use tripwise_domain::{Message, Role};

use crate::config::FileLlmConfig;

/// LLM gateway speaking the OpenAI chat-completions protocol
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAiCompatibleGateway {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key: None,
            temperature: 0.3,
        })
    }

    /// Build a gateway from the `[llm]` config section, reading the API key
    /// from the configured environment variable.
    pub fn from_config(config: &FileLlmConfig) -> Result<Self, GatewayError> {
        let gateway = Self::new(
            &config.base_url,
            config.model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?
        .with_temperature(config.temperature);

        Ok(match config.api_key() {
            Some(key) => gateway.with_api_key(key),
            None => {
                warn!(
                    env = %config.api_key_env,
                    "No API key set; sending unauthenticated requests"
                );
                gateway
            }
        })
    }

    // ==================== Builder Methods ====================

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Human => "user",
        Role::Assistant => "assistant",
    }
}

/// JSON body of a chat-completions request.
pub fn request_body(model: &str, temperature: f32, messages: &[Message]) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| json!({"role": wire_role(m.role), "content": m.content}))
        .collect();
    json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
    })
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

/// Text of the first choice in a chat-completions response.
pub fn parse_completion(body: &str) -> Result<String, GatewayError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(content)
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
        debug!(model = %self.model, messages = messages.len(), "Chat completion request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&request_body(&self.model, self.temperature, messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_str(&body, 300)
            )));
        }

        parse_completion(&body)
    }
}
