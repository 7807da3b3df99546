//! # medroute-contracts
//!
//! Shared types, schemas, and contracts for the MEDROUTE delegation runtime.
//!
//! All crates in the workspace import from here. This crate holds data
//! definitions and error types only.

pub mod conversation;
pub mod delegation;
pub mod error;
pub mod handler;
pub mod record;
pub mod verify;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use conversation::{ConversationTurn, GenerateResponse, Part, Role, StructuredCall};
    use delegation::{DelegationResult, DelegationStatus};
    use error::MedrouteError;
    use handler::{HandlerType, TurnId};
    use record::{Section, SubjectRecord};

    // ── HandlerType ──────────────────────────────────────────────────────────

    #[test]
    fn coordinator_is_not_delegable() {
        assert!(!HandlerType::Coordinator.is_delegable());
        for handler in HandlerType::DELEGABLE {
            assert!(handler.is_delegable(), "{handler} must be delegable");
        }
    }

    #[test]
    fn handler_type_serializes_upper_snake() {
        let json = serde_json::to_string(&HandlerType::PatientManagement).unwrap();
        assert_eq!(json, "\"PATIENT_MANAGEMENT\"");
        assert_eq!(HandlerType::MedicalRecords.to_string(), "MEDICAL_RECORDS");
    }

    #[test]
    fn turn_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| TurnId::new().to_string()).collect();
        assert_eq!(ids.len(), 50);
    }

    // ── GenerateResponse ─────────────────────────────────────────────────────

    #[test]
    fn first_call_ignores_later_calls() {
        let response = GenerateResponse {
            parts: vec![
                Part::Text("memeriksa".to_string()),
                Part::FunctionCall(StructuredCall {
                    name: "first".to_string(),
                    arguments: json!({}),
                }),
                Part::FunctionCall(StructuredCall {
                    name: "second".to_string(),
                    arguments: json!({}),
                }),
            ],
        };

        assert_eq!(response.first_call().unwrap().name, "first");
        assert_eq!(response.text().as_deref(), Some("memeriksa"));
    }

    #[test]
    fn response_without_text_has_no_text() {
        let response = GenerateResponse::from_call("op", json!({}));
        assert!(response.text().is_none());

        let empty = GenerateResponse::from_text("");
        assert!(empty.text().is_none());
    }

    #[test]
    fn into_model_turn_keeps_parts() {
        let response = GenerateResponse::from_call("op", json!({ "permintaan_pengguna": "x" }));
        let turn = response.clone().into_model_turn();
        assert_eq!(turn.role, Role::Model);
        assert_eq!(turn.parts, response.parts);
    }

    #[test]
    fn conversation_turn_helpers() {
        assert_eq!(ConversationTurn::user("halo").text().as_deref(), Some("halo"));
        assert_eq!(ConversationTurn::model("hai").role, Role::Model);
        let f = ConversationTurn::function_response("op", json!({ "result": 1 }));
        assert_eq!(f.role, Role::Function);
        assert!(f.text().is_none());
    }

    // ── SubjectRecord ────────────────────────────────────────────────────────

    #[test]
    fn subject_record_reads_wire_keys() {
        let record: SubjectRecord = serde_json::from_value(json!({
            "biodata": { "name": "Budi Santoso", "address": "Bandung" },
            "medical_history": { "diagnosis": "Bronkitis" },
            "billing": { "total_outstanding": 150000 }
        }))
        .unwrap();

        assert_eq!(record.display_name(), Some("Budi Santoso"));
        assert!(record.section(Section::Clinical).is_some());
        assert!(record.section(Section::Scheduling).is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn sentinel_record_keeps_free_fields_only() {
        let record: SubjectRecord = serde_json::from_value(json!({
            "name": "Pasien Umum",
            "status": "placeholder"
        }))
        .unwrap();

        assert!(record.display_name().is_none());
        for section in [Section::Identity, Section::Clinical, Section::Scheduling, Section::Billing] {
            assert!(record.section(section).is_none());
        }
        assert_eq!(
            record.to_value(),
            json!({ "name": "Pasien Umum", "status": "placeholder" })
        );
    }

    // ── DelegationResult ─────────────────────────────────────────────────────

    #[test]
    fn delegation_result_uses_model_facing_names() {
        let result = DelegationResult {
            status: DelegationStatus::Success,
            analysis: "ok".to_string(),
            data_snapshot: json!({ "diagnosis": "Bronkitis" }),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["agent_analysis"], "ok");
        assert_eq!(value["source_data_snapshot"]["diagnosis"], "Bronkitis");
    }

    // ── MedrouteError ────────────────────────────────────────────────────────

    #[test]
    fn error_unknown_operation_display() {
        let err = MedrouteError::UnknownOperation {
            name: "panggil_sub_agen_tidak_dikenal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown operation"));
        assert!(msg.contains("panggil_sub_agen_tidak_dikenal"));
        assert!(err.aborts_turn());
    }

    #[test]
    fn error_capability_unavailable_display() {
        let err = MedrouteError::CapabilityUnavailable {
            reason: "HTTP 503".to_string(),
        };
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.aborts_turn());
    }

    #[test]
    fn config_and_audit_errors_do_not_abort_turns() {
        let config = MedrouteError::ConfigError {
            reason: "missing scope".to_string(),
        };
        let audit = MedrouteError::AuditWriteFailed {
            reason: "lock poisoned".to_string(),
        };
        assert!(config.to_string().contains("configuration error"));
        assert!(!config.aborts_turn());
        assert!(!audit.aborts_turn());
    }
}
