//! Blocking `TextGenerator` backed by the Gemini REST API.

use std::time::Duration;

use tracing::{debug, warn};

use medroute_contracts::{
    conversation::{GenerateRequest, GenerateResponse},
    error::{MedrouteError, MedrouteResult},
};
use medroute_core::traits::TextGenerator;

use crate::{
    config::GeminiConfig,
    wire::{WireRequest, WireResponse},
};

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

pub struct GeminiClient {
    config: GeminiConfig,
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Build the HTTP client. A missing API key is not an error here; every
    /// call then fails with `CapabilityUnavailable`.
    pub fn new(config: GeminiConfig) -> MedrouteResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MedrouteError::ConfigError {
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: config.endpoint(),
            config,
            client,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn unavailable(&self, reason: String) -> MedrouteError {
        warn!(model = %self.config.model, %reason, "gemini call failed");
        MedrouteError::CapabilityUnavailable { reason }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> MedrouteResult<GenerateResponse> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| self.unavailable("no Gemini API key configured".to_string()))?;

        let body = WireRequest::from_request(request);
        debug!(
            model = %self.config.model,
            turns = request.contents.len(),
            tools = request.tools.len(),
            temperature = ?request.temperature,
            "calling gemini"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    self.unavailable(format!("cannot connect to {}", self.config.base_url))
                } else if e.is_timeout() {
                    self.unavailable(format!(
                        "request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    self.unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(self.unavailable(format!("Gemini returned HTTP {}: {}", status.as_u16(), body)));
        }

        let parsed: WireResponse = response
            .json()
            .map_err(|e| self.unavailable(format!("malformed Gemini response: {}", e)))?;

        if parsed.candidates.is_empty() {
            debug!(feedback = ?parsed.prompt_feedback, "gemini returned no candidates");
        }

        Ok(parsed.into_response())
    }
}
