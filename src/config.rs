//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.assessor.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".assessor.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Insight generation settings.
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// SQLite database path.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Dimension catalog JSON path.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            catalog: default_catalog(),
            verbose: false,
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from("data/assessments.db")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("data/framework_data.json")
}

/// Which generator produces narrative insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic templates only.
    #[default]
    Rules,
    /// Ollama chat API, falling back to rules on failure.
    Ollama,
}

/// Insight generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds; a timeout falls back to rule-based insights.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Optional bearer token for hosted endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            ollama_url: default_ollama_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
            api_key: None,
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    60
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Length of the strengths and challenges lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    crate::scoring::DEFAULT_TOP_N
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// override values they explicitly provide.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref database) = args.database {
            self.general.database = database.clone();
        }
        if let Some(ref catalog) = args.catalog {
            self.general.catalog = catalog.clone();
        }

        if let Some(provider) = args.provider {
            self.insights.provider = provider;
        }
        if let Some(ref url) = args.ollama_url {
            self.insights.ollama_url = url.clone();
        }
        if let Some(ref model) = args.model {
            self.insights.model = model.clone();
        }
        if let Some(timeout) = args.timeout {
            self.insights.timeout_seconds = timeout;
        }
        if let Some(ref key) = args.api_key {
            self.insights.api_key = Some(key.clone());
        }

        if let Some(top_n) = args.top_n {
            self.report.top_n = top_n;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database, PathBuf::from("data/assessments.db"));
        assert_eq!(config.insights.provider, ProviderKind::Rules);
        assert_eq!(config.insights.timeout_seconds, 60);
        assert_eq!(config.report.top_n, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
database = "/tmp/assess.db"
verbose = true

[insights]
provider = "ollama"
model = "qwen2.5:14b"
temperature = 0.2

[report]
top_n = 3
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.database, PathBuf::from("/tmp/assess.db"));
        assert_eq!(config.general.catalog, PathBuf::from("data/framework_data.json"));
        assert!(config.general.verbose);
        assert_eq!(config.insights.provider, ProviderKind::Ollama);
        assert_eq!(config.insights.model, "qwen2.5:14b");
        assert_eq!(config.insights.temperature, 0.2);
        assert_eq!(config.insights.ollama_url, "http://localhost:11434");
        assert_eq!(config.report.top_n, 3);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[insights]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("provider = \"rules\""));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.top_n, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[report]\ntop_n = 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.report.top_n, 7);
        assert_eq!(config.insights.provider, ProviderKind::Rules);

        std::fs::write(&path, "[report\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
