//! Data-provider settings (`[tools]` section)

use serde::{Deserialize, Serialize};

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// How long provider responses stay cached
    pub cache_ttl_seconds: u64,
    /// User-Agent sent to public data providers
    pub user_agent: String,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 600,
            user_agent: concat!("tripwise/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
