//! Command line argument parsing for the spamcheck CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::classifier::ModelSelector;
use crate::pipeline::config::SpamcheckConfig;

/// spamcheck - classify short messages as spam or not spam
#[derive(Parser, Debug, Clone)]
#[command(name = "spamcheck")]
#[command(about = "Classify short text messages as spam or not spam")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamcheckArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(long, env = "SPAMCHECK_CONFIG", value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// TF-IDF vectorizer artifact
    #[arg(long, env = "SPAMCHECK_VECTORIZER", value_name = "PATH", global = true)]
    pub vectorizer: Option<PathBuf>,

    /// Primary (SVC) model artifact
    #[arg(long, env = "SPAMCHECK_PRIMARY_MODEL", value_name = "PATH", global = true)]
    pub primary_model: Option<PathBuf>,

    /// Secondary (naive Bayes) model artifact
    #[arg(long, env = "SPAMCHECK_SECONDARY_MODEL", value_name = "PATH", global = true)]
    pub secondary_model: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpamcheckArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }

    /// Resolve the configuration: the config file if given, otherwise the
    /// defaults, with artifact path flags taking precedence over both.
    pub fn load_config(&self) -> Result<SpamcheckConfig> {
        let mut config = match &self.config {
            Some(path) => SpamcheckConfig::from_file(path)?,
            None => SpamcheckConfig::default(),
        };

        if let Some(path) = &self.vectorizer {
            config.artifacts.vectorizer = path.clone();
        }
        if let Some(path) = &self.primary_model {
            config.artifacts.primary_model = path.clone();
        }
        if let Some(path) = &self.secondary_model {
            config.artifacts.secondary_model = path.clone();
        }

        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a single message
    Classify(ClassifyArgs),

    /// Print the normalized form of a message
    Normalize(NormalizeArgs),

    /// Classify every line of a file
    Batch(BatchArgs),

    /// Show the loaded artifacts
    Info,
}

/// Arguments for classifying a message
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Message text
    #[arg(value_name = "MESSAGE", required_unless_present = "example")]
    pub message: Option<String>,

    /// Model to classify with (svc or nb)
    #[arg(short, long, default_value = "svc")]
    pub model: ModelSelector,

    /// Classify the built-in example spam message
    #[arg(long, conflicts_with = "message")]
    pub example: bool,
}

impl ClassifyArgs {
    /// The message to classify.
    pub fn text(&self) -> &str {
        if self.example {
            EXAMPLE_MESSAGE
        } else {
            self.message.as_deref().unwrap_or_default()
        }
    }
}

/// Arguments for normalizing a message
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Message text
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

/// Arguments for batch classification
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File with one message per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Model to classify with (svc or nb)
    #[arg(short, long, default_value = "svc")]
    pub model: ModelSelector,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Sample spam message used by `classify --example`.
pub const EXAMPLE_MESSAGE: &str = "Congratulations! You've won $1,000,000! Click here to claim your prize: bit.ly/winprize123\nLimited time offer!";
