//! TTL response cache for provider tools.
//!
//! [`CachedTool`] wraps a network-backed [`Tool`] and memoizes successful
//! payloads keyed by tool name and normalized arguments. Failures are never
//! cached so a transient outage does not stick.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::trace;
use tripwise_domain::{Tool, ToolCall, ToolDefinition, ToolError};

/// In-memory cache with a fixed time-to-live.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Value)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key for a call: string arguments are trimmed and lowercased so
    /// "Tokyo" and " tokyo" share an entry.
    pub fn key(call: &ToolCall) -> String {
        let args: Vec<String> = call
            .arguments
            .iter()
            .map(|(name, value)| match value.as_str() {
                Some(s) => format!("{}={}", name, s.trim().to_lowercase()),
                None => format!("{}={}", name, value),
            })
            .collect();
        format!("{}?{}", call.tool, args.join("&"))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, sweeping every expired entry first so the
    /// map only holds live responses.
    pub fn insert(&self, key: String, value: Value) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
            entries.insert(key, (Instant::now(), value));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tool whose successful results are served from a [`ResponseCache`].
pub struct CachedTool<T> {
    inner: T,
    cache: Arc<ResponseCache>,
}

impl<T: Tool> CachedTool<T> {
    pub fn new(inner: T, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<T: Tool> Tool for CachedTool<T> {
    fn definition(&self) -> &ToolDefinition {
        self.inner.definition()
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let key = ResponseCache::key(call);
        if let Some(hit) = self.cache.get(&key) {
            trace!(key = %key, "Cache hit");
            return Ok(hit);
        }

        let payload = self.inner.execute(call).await?;
        self.cache.insert(key, payload.clone());
        Ok(payload)
    }
}
