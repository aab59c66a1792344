//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and the `dimension=score` pair syntax.

use crate::config::ProviderKind;
use crate::models::{UseCaseKey, MAX_SCORE, MIN_SCORE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Assessor - readiness scoring for AI and automation use cases
///
/// Score candidate use cases against a weighted dimension catalog, keep the
/// results in a local database, and export them as CSV, JSON, or Markdown.
///
/// Examples:
///   assessor create --id UC-7 --name "Claims intake"
///   assessor assess 1 --scores scores.json
///   assessor assess 1 --score "Business Impact & Value=4"
///   assessor export 1 --format markdown
///   assessor init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .assessor.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// SQLite database path
    #[arg(long, value_name = "FILE", env = "ASSESSOR_DB", global = true)]
    pub database: Option<PathBuf>,

    /// Dimension catalog JSON path
    #[arg(long, value_name = "FILE", env = "ASSESSOR_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Insight provider (rules, ollama)
    #[arg(long, value_name = "PROVIDER", global = true)]
    pub provider: Option<ProviderKind>,

    /// Ollama API endpoint URL
    #[arg(long, value_name = "URL", env = "OLLAMA_URL", global = true)]
    pub ollama_url: Option<String>,

    /// Model used for remote insights
    #[arg(long, value_name = "MODEL", env = "ASSESSOR_MODEL", global = true)]
    pub model: Option<String>,

    /// Bearer token for hosted insight endpoints
    #[arg(
        long,
        value_name = "KEY",
        env = "ASSESSOR_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// Insight request timeout in seconds
    ///
    /// When exceeded, rule-based insights are used instead.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Number of strengths and challenges to list
    #[arg(long, value_name = "COUNT", global = true)]
    pub top_n: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List catalog dimensions grouped by category
    Catalog,

    /// Register a new use case
    Create {
        /// Caller-chosen unique identifier
        #[arg(long, value_name = "ID")]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value = "")]
        business_unit: String,

        #[arg(long, default_value = "")]
        process_owner: String,
    },

    /// List use cases, newest first
    List,

    /// Show a use case and its latest assessment
    Show {
        key: UseCaseKey,
    },

    /// Score a use case and store the assessment
    ///
    /// Every catalog dimension must be scored. Scores may come from a JSON
    /// file mapping dimension names to 1-5, from repeated --score pairs, or
    /// both (pairs win).
    Assess {
        key: UseCaseKey,

        /// JSON object of dimension name to score
        #[arg(long, value_name = "FILE")]
        scores: Option<PathBuf>,

        /// Single score as "dimension=N", may be repeated
        #[arg(long = "score", value_name = "DIM=N", value_parser = parse_score_pair)]
        score: Vec<(String, u8)>,

        /// Start from the currently stored scores
        #[arg(long)]
        revise: bool,
    },

    /// Delete a use case and its assessment
    Delete {
        key: UseCaseKey,
    },

    /// Export an assessment
    Export {
        key: UseCaseKey,

        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: ExportFormat,

        /// Output file (defaults to assessment_<id>.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show portfolio statistics
    Stats,

    /// Generate a default .assessor.toml configuration file
    InitConfig,
}

/// Output format for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Markdown format (default)
    #[default]
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Parse a `dimension=score` pair. The last `=` separates the score, so
/// dimension names may themselves contain `=`.
pub fn parse_score_pair(raw: &str) -> Result<(String, u8), String> {
    let (name, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected DIMENSION=SCORE, got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing dimension name in '{}'", raw));
    }

    let score: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("score must be a number, got '{}'", value.trim()))?;
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "score must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, score
        ));
    }

    Ok((name.to_string(), score))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.top_n == Some(0) {
            return Err("--top-n must be at least 1".to_string());
        }

        match &self.command {
            Command::Create { id, name, .. } => {
                if id.trim().is_empty() {
                    return Err("Use case id must not be empty".to_string());
                }
                if name.trim().is_empty() {
                    return Err("Use case name must not be empty".to_string());
                }
            }
            Command::Assess {
                scores,
                score,
                revise,
                ..
            } => {
                if scores.is_none() && score.is_empty() && !revise {
                    return Err("Provide --scores FILE, --score DIM=N, or --revise".to_string());
                }
                if let Some(path) = scores {
                    if !path.is_file() {
                        return Err(format!("Scores file does not exist: {}", path.display()));
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
