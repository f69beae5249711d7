//! Language model endpoint configuration (`[llm]` section)

use serde::{Deserialize, Serialize};

/// Raw LLM configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.3,
            timeout_seconds: 60,
        }
    }
}

impl FileLlmConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// Local OpenAI-compatible servers often need no key, so a missing
    /// variable is not an error.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
