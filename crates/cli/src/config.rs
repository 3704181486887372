use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Anthropic API key (env var and --api-key take precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API base URL
    #[serde(default = "default_base_url")]
    pub anthropic_base_url: String,

    /// Maximum conversation turns per query
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Maximum tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_max_turns() -> usize {
    10
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            anthropic_base_url: default_base_url(),
            max_turns: default_max_turns(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AppConfig {
    /// Return the default config file path: ~/.config/toolchat/config.toml
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("toolchat");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config (and writes it out) if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "config file not found, using defaults");
            let config = Self::default();
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            if let Ok(toml_str) = toml::to_string_pretty(&config) {
                std::fs::write(&config_path, toml_str).ok();
            }
            Ok(config)
        }
    }

    /// Resolve the API key. Priority: cli_override > env var > config file.
    pub fn resolve_api_key(&self, cli_override: Option<&str>) -> Option<String> {
        if let Some(key) = cli_override {
            return Some(key.to_string());
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.api_key.clone()
    }

    /// Resolve the model name. Priority: cli_override > config file.
    pub fn resolve_model(&self, cli_override: Option<&str>) -> String {
        cli_override.map(str::to_string).unwrap_or_else(|| self.model.clone())
    }
}
