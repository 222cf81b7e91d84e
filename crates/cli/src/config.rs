use anyhow::{Context, Result};
use chef_core::config::{
    DEFAULT_COOKBOOK_PATH, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_CORPUS_CHARS,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::cli::CliArgs;

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Gemini API key (prefer GEMINI_API_KEY in the environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Gemini model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Gemini API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum cookbook characters placed in the prompt
    #[serde(default = "default_max_corpus_chars")]
    pub max_corpus_chars: usize,

    /// Cookbooks memorized at startup when none are given on the command line
    #[serde(default = "default_cookbooks")]
    pub cookbooks: Vec<PathBuf>,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_max_corpus_chars() -> usize {
    DEFAULT_MAX_CORPUS_CHARS
}

fn default_cookbooks() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_COOKBOOK_PATH)]
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_corpus_chars: default_max_corpus_chars(),
            cookbooks: default_cookbooks(),
        }
    }
}

/// Effective settings after layering flags, environment and config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_corpus_chars: usize,
    pub cookbooks: Vec<PathBuf>,
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/satvik-chef/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("satvik-chef");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            let config = Self::default();
            // Create directory and write default config
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let toml_str = toml::to_string_pretty(&config)
                .context("failed to serialize default config")?;
            std::fs::write(&config_path, toml_str).ok();
            Ok(config)
        }
    }

    /// Resolve the API key.
    /// Priority: cli_override > env var > config file. Blank values are ignored.
    pub fn resolve_api_key(&self, cli_override: Option<&str>, env: &chef_core::Config) -> Option<String> {
        [cli_override, env.llm.api_key.as_deref(), self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(String::from)
    }

    /// Resolve the model name.
    /// Priority: cli_override > env var > config file (which carries the default).
    pub fn resolve_model(&self, cli_override: Option<&str>, env: &chef_core::Config) -> String {
        cli_override
            .or(env.llm.model.as_deref())
            .unwrap_or(&self.model)
            .to_string()
    }

    /// Layer command-line flags, environment and this file into the settings
    /// the session runs with. A zero character budget is skipped.
    pub fn resolve(&self, args: &CliArgs, env: &chef_core::Config) -> Settings {
        let cookbooks = if !args.files.is_empty() {
            args.files.clone()
        } else if let Some(path) = &env.corpus.cookbook_path {
            vec![path.clone()]
        } else {
            self.cookbooks.clone()
        };

        Settings {
            api_key: self.resolve_api_key(args.api_key.as_deref(), env),
            model: self.resolve_model(args.model.as_deref(), env),
            base_url: env.llm.base_url.clone().unwrap_or_else(|| self.base_url.clone()),
            temperature: env.llm.temperature.unwrap_or(self.temperature),
            max_tokens: env.llm.max_tokens.unwrap_or(self.max_tokens),
            max_corpus_chars: [
                args.max_corpus_chars,
                env.corpus.max_chars,
                Some(self.max_corpus_chars),
            ]
            .into_iter()
            .flatten()
            .find(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CORPUS_CHARS),
            cookbooks,
        }
    }
}
