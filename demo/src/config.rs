//! `medroute.toml` loading.
//!
//! ```toml
//! [gemini]
//! model = "gemini-2.5-flash"
//! timeout_secs = 60
//!
//! [store]
//! fetch_latency_ms = 1000
//! records_path = "records.json"
//! ```
//!
//! Every field is optional. `GEMINI_API_KEY` / `API_KEY` override
//! `gemini.api_key`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use medroute_contracts::error::{MedrouteError, MedrouteResult};
use medroute_gemini::GeminiConfig;
use medroute_ref_hospital::store::InMemoryRecordStore;

pub const DEFAULT_CONFIG_FILE: &str = "medroute.toml";

/// Simulated fetch delay of the original hospital backend.
pub const DEFAULT_FETCH_LATENCY_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub fetch_latency_ms: u64,
    /// JSON record table replacing the built-in mock records.
    pub records_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fetch_latency_ms: DEFAULT_FETCH_LATENCY_MS,
            records_path: None,
        }
    }
}

impl AppConfig {
    /// Read `path`, or `medroute.toml` in the working directory when present,
    /// or fall back to defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> MedrouteResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(Self {
            gemini: config.gemini.with_env_overrides(),
            ..config
        })
    }

    pub fn from_file(path: &Path) -> MedrouteResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to read config '{}': {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> MedrouteResult<Self> {
        toml::from_str(s).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }
}

impl StoreConfig {
    pub fn build_store(&self) -> MedrouteResult<InMemoryRecordStore> {
        let store = match &self.records_path {
            Some(path) => InMemoryRecordStore::from_file(path)?,
            None => InMemoryRecordStore::hospital()?,
        };
        Ok(store.with_latency(Duration::from_millis(self.fetch_latency_ms)))
    }
}

#[cfg(test)]
mod tests {
    use medroute_contracts::error::MedrouteError;

    use super::{AppConfig, DEFAULT_FETCH_LATENCY_MS};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.store.fetch_latency_ms, DEFAULT_FETCH_LATENCY_MS);
        assert!(config.store.records_path.is_none());
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [gemini]
            model = "gemini-2.0-flash"

            [store]
            fetch_latency_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.store.fetch_latency_ms, 0);
        assert!(config.store.build_store().is_ok());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[store]\nfetch_latency_ms = \"soon\""),
            Err(MedrouteError::ConfigError { .. })
        ));
    }
}
