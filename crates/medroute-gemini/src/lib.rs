//! # medroute-gemini
//!
//! [`GeminiClient`] implements `TextGenerator` over the Gemini
//! `generateContent` REST endpoint using a blocking `reqwest` client.
//! Transport, auth, quota and parse failures all surface as
//! `MedrouteError::CapabilityUnavailable`; nothing is retried.

pub mod client;
pub mod config;
pub mod wire;

pub use client::GeminiClient;
pub use config::GeminiConfig;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use medroute_contracts::{
        conversation::{ConversationTurn, GenerateRequest, Part},
        error::MedrouteError,
    };
    use medroute_core::{traits::TextGenerator, ToolCatalog};

    use crate::{
        config::{GeminiConfig, DEFAULT_MODEL},
        wire::{upper_case_types, WireRequest, WireResponse},
        GeminiClient,
    };

    fn make_request(temperature: Option<f32>, with_tools: bool) -> GenerateRequest {
        let catalog = ToolCatalog::hospital();
        GenerateRequest {
            system_directive: catalog.coordinator_directive().to_string(),
            tools: if with_tools { catalog.declarations() } else { Vec::new() },
            temperature,
            contents: vec![
                ConversationTurn::user("Halo"),
                ConversationTurn::model("Halo, ada yang bisa dibantu?"),
                ConversationTurn::function_response(
                    "panggil_sub_agen_penagihan",
                    json!({ "result": { "status": "SUCCESS" } }),
                ),
            ],
        }
    }

    fn to_json(request: &GenerateRequest) -> Value {
        serde_json::to_value(WireRequest::from_request(request)).unwrap()
    }

    // ── Request mapping ───────────────────────────────────────────────────────

    #[test]
    fn test_request_uses_camel_case_fields() {
        let body = to_json(&make_request(Some(0.0), true));

        assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["tools"][0]["functionDeclarations"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_request_maps_roles_and_parts() {
        let body = to_json(&make_request(None, false));
        let contents = body["contents"].as_array().unwrap();

        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "function");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["name"],
            "panggil_sub_agen_penagihan"
        );
        assert!(contents[0]["parts"][0].get("functionCall").is_none());
    }

    #[test]
    fn test_request_without_tools_or_temperature_omits_them() {
        let body = to_json(&make_request(None, false));

        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_parameter_types_are_upper_cased() {
        let body = to_json(&make_request(Some(0.0), true));
        let params = &body["tools"][0]["functionDeclarations"][0]["parameters"];

        assert_eq!(params["type"], "OBJECT");
        assert_eq!(params["properties"]["permintaan_pengguna"]["type"], "STRING");
        assert_eq!(params["required"][0], "permintaan_pengguna");
    }

    #[test]
    fn test_upper_case_types_leaves_descriptions_alone() {
        let schema = json!({ "type": "string", "description": "type of thing" });
        assert_eq!(
            upper_case_types(&schema),
            json!({ "type": "STRING", "description": "type of thing" })
        );
    }

    // ── Response mapping ──────────────────────────────────────────────────────

    #[test]
    fn test_response_with_function_call() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "panggil_sub_agen_rekam_medis",
                            "args": { "permintaan_pengguna": "Hasil lab 3273123456789012" }
                        }
                    }]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let response = wire.into_response();
        let call = response.first_call().unwrap();
        assert_eq!(call.name, "panggil_sub_agen_rekam_medis");
        assert_eq!(call.arguments["permintaan_pengguna"], "Hasil lab 3273123456789012");
    }

    #[test]
    fn test_response_call_without_args_gets_empty_object() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "functionCall": { "name": "x" } }] } }]
        }))
        .unwrap();

        let response = wire.into_response();
        assert_eq!(response.first_call().unwrap().arguments, json!({}));
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "Jadwal Anda hari Senin." }
                    ]
                }
            }]
        }))
        .unwrap();

        let response = wire.into_response();
        assert_eq!(response.parts, vec![Part::Text("Jadwal Anda hari Senin.".to_string())]);
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let wire: WireResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap();

        let response = wire.into_response();
        assert!(response.parts.is_empty());
        assert!(response.text().is_none());
    }

    // ── Config ────────────────────────────────────────────────────────────────

    #[test]
    fn test_config_defaults_and_partial_toml() {
        let config: GeminiConfig = toml::from_str("timeout_secs = 5").unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.api_key().is_none());
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_env_key_precedence() {
        let config = GeminiConfig {
            api_key: Some("from-file".to_string()),
            ..GeminiConfig::default()
        };

        let overridden = config.clone().with_key_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("  ".to_string()),
            "API_KEY" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(overridden.api_key(), Some("from-env"));

        let untouched = config.with_key_lookup(|_| None);
        assert_eq!(untouched.api_key(), Some("from-file"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = GeminiConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            model: "m".to_string(),
            ..GeminiConfig::default()
        };
        assert_eq!(config.endpoint(), "http://localhost:8080/v1beta/models/m:generateContent");
    }

    // ── Client ────────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_key_is_capability_unavailable() {
        let client = GeminiClient::new(GeminiConfig::default()).unwrap();

        match client.generate(&make_request(Some(0.0), true)) {
            Err(MedrouteError::CapabilityUnavailable { reason }) => {
                assert!(reason.contains("API key"), "{reason}");
            }
            other => panic!("expected CapabilityUnavailable, got {:?}", other),
        }
    }
}
