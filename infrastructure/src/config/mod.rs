//! Configuration file loading for tripwise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./tripwise.toml` or `./.tripwise.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/tripwise/config.toml`
//! 4. Environment variables prefixed `TRIPWISE_`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAssistantConfig, FileConfig, FileLlmConfig, FileLoggingConfig,
    FileToolsConfig, MAX_HISTORY_SCAN_TURNS,
};
pub use loader::ConfigLoader;
