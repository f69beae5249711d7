//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The answer with a short summary of tools used
    Full,
    /// Only the answer text
    Answer,
    /// JSON result object
    Json,
}

/// CLI arguments for tripwise
#[derive(Parser, Debug)]
#[command(name = "tripwise")]
#[command(author, version, about = "Travel assistant that answers from live data, not guesses")]
#[command(long_about = r#"
tripwise answers travel questions with a language model whose facts come
from live data sources: weather, country facts, exchange rates, hotels and
points of interest. Answers that contradict the data are corrected before
they are shown.

Configuration files are loaded from (in priority order):
1. --config <path>                  Explicit config file
2. ./tripwise.toml                  Project-level config
3. ~/.config/tripwise/config.toml   Global config
Environment variables (TRIPWISE_LLM__MODEL, ...) override the defaults.

Example:
  tripwise "What should I pack for Tokyo in March?"
  tripwise --json "Convert 100 USD to EUR"
  tripwise --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Override the language model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Print the result as JSON (same as `--output json`)
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append conversation events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

impl Cli {
    /// Effective output format after `--json`
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}
