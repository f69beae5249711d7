//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["tripwise.toml", ".tripwise.toml"];

/// Prefix of configuration environment variables; `__` separates sections
/// (`TRIPWISE_ASSISTANT__DEFAULT_ORIGIN=Paris`).
const ENV_PREFIX: &str = "TRIPWISE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./tripwise.toml` or `./.tripwise.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/tripwise/config.toml`
    /// 4. Environment variables prefixed `TRIPWISE_`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tripwise").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources being used (for `--show-config`)
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<7}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND  ] Project:  {}", path.display())),
            None => lines.push("  [       ] Project:  ./tripwise.toml or ./.tripwise.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            lines.push(format!("  [{:<7}] Global:   {}", mark, path.display()));
        }

        lines.push(format!("  [       ] Env:      {}*", ENV_PREFIX));
        lines.push("  [       ] Default:  built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("tripwise"));
    }

    #[test]
    fn test_project_file_and_env_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tripwise.toml",
                r#"
                [assistant]
                default_origin = "Dublin"
                "#,
            )?;
            jail.set_env("TRIPWISE_ASSISTANT__DEFAULT_ORIGIN", "Paris");
            jail.set_env("TRIPWISE_LLM__MODEL", "llama3");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.assistant.default_origin, "Dublin");
            assert_eq!(config.llm.model, "llama3");
            assert_eq!(config.assistant.history_window, 20);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_wins() {
        Jail::expect_with(|jail| {
            jail.create_file(".tripwise.toml", "[tools]\ncache_ttl_seconds = 30\n")?;
            jail.create_file("custom.toml", "[tools]\ncache_ttl_seconds = 5\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.tools.cache_ttl_seconds, 5);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("tripwise.toml", "[assistant]\nhistory_window = \"many\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
