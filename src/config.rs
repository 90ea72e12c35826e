use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .code-reviewer.toml.
/// All fields are optional — the tool works with zero config plus
/// GEMINI_API_KEY in the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Gemini endpoint settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Review session settings
    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key. If None, falls back to GEMINI_API_KEY env var.
    pub api_key: Option<String>,

    /// Model name (defaults to gemini-1.5-flash)
    pub model: Option<String>,

    /// Sampling temperature (defaults to 0.3)
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewConfig {
    /// Default to agent mode without passing --agent
    #[serde(default)]
    pub agent: bool,

    /// Session history retention (defaults to 5 entries)
    pub history_limit: Option<usize>,
}

impl Config {
    /// Load configuration from .code-reviewer.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".code-reviewer.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the Gemini API key: config file value takes precedence,
    /// falls back to GEMINI_API_KEY env var.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }

    pub fn model(&self) -> String {
        self.gemini
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn temperature(&self) -> f64 {
        self.gemini.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn history_limit(&self) -> usize {
        self.review.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
