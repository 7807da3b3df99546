//! Connection settings for the Gemini REST API.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variables checked for the API key, first match wins.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// The `[gemini]` table of `medroute.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl GeminiConfig {
    /// Replace `api_key` with the first non-empty value of `API_KEY_ENV_VARS`.
    pub fn with_env_overrides(self) -> Self {
        self.with_key_lookup(|name| std::env::var(name).ok())
    }

    /// `with_env_overrides` against an arbitrary variable source.
    pub fn with_key_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());
        if let Some(key) = from_env {
            self.api_key = Some(key);
        }
        self
    }

    /// The key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// `{base_url}/models/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}
