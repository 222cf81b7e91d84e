use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_MAX_CORPUS_CHARS: usize = 200_000;
pub const DEFAULT_COOKBOOK_PATH: &str = "cookbook.pdf";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

/// Profiled lookup parsed into `T`; unparseable values are treated as unset.
fn profiled_env_parse<T: FromStr>(profile: &str, key: &str) -> Option<T> {
    let raw = profiled_env_opt(profile, key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable env value");
            None
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Settings read from the environment. Every field is optional so the CLI can
/// layer its own flags and config file on top; defaults live in the constants
/// above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub corpus: CorpusConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `CHEF_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("CHEF_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p),
            corpus: CorpusConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  llm:     api_key={}, model={}, base_url={}",
            if self.llm.is_configured() { "set" } else { "(none)" },
            self.llm.model.as_deref().unwrap_or("(default)"),
            self.llm.base_url.as_deref().unwrap_or("(default)"),
        );
        tracing::info!(
            "  corpus:  max_chars={}, cookbook={}",
            self.corpus
                .max_chars
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(default)".into()),
            self.corpus
                .cookbook_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
        );
    }
}

// ── LLM (Gemini) ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "GEMINI_API_KEY")
                .or_else(|| profiled_env_opt(p, "GOOGLE_API_KEY")),
            model: profiled_env_opt(p, "GEMINI_MODEL"),
            base_url: profiled_env_opt(p, "GEMINI_BASE_URL"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE"),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Cookbook corpus ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub max_chars: Option<usize>,
    /// Cookbook loaded at startup when no files are given on the command line.
    pub cookbook_path: Option<PathBuf>,
}

impl CorpusConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_chars: profiled_env_parse(p, "CORPUS_MAX_CHARS"),
            cookbook_path: profiled_env_opt(p, "COOKBOOK_PATH").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own key names so parallel tests don't race on env.

    #[test]
    fn profiled_lookup_prefers_prefixed_key() {
        env::set_var("CHEFTEST_A_MODEL_KEY", "plain");
        env::set_var("PRODA_CHEFTEST_A_MODEL_KEY", "prefixed");
        assert_eq!(
            profiled_env_opt("PRODA", "CHEFTEST_A_MODEL_KEY").as_deref(),
            Some("prefixed")
        );
        assert_eq!(
            profiled_env_opt("", "CHEFTEST_A_MODEL_KEY").as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn profiled_lookup_falls_back_to_plain_key() {
        env::set_var("CHEFTEST_B_KEY", "plain");
        assert_eq!(
            profiled_env_opt("STAGEB", "CHEFTEST_B_KEY").as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        env::set_var("CHEFTEST_C_KEY", "");
        assert!(profiled_env_opt("", "CHEFTEST_C_KEY").is_none());
    }

    #[test]
    fn unparseable_numbers_are_ignored() {
        env::set_var("CHEFTEST_D_LIMIT", "lots");
        env::set_var("CHEFTEST_D_OTHER", "1200");
        assert_eq!(profiled_env_parse::<usize>("", "CHEFTEST_D_LIMIT"), None);
        assert_eq!(profiled_env_parse::<usize>("", "CHEFTEST_D_OTHER"), Some(1200));
    }

    #[test]
    fn profile_label_defaults() {
        let config = Config::default();
        assert_eq!(config.profile_label(), "default");
        assert!(!config.llm.is_configured());
    }
}
