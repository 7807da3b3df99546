//! # medroute-ref-hospital
//!
//! Hospital reference runtime for the MEDROUTE delegation protocol.
//!
//! Provides the pieces a hospital deployment plugs into `medroute-core`:
//!
//! - [`store::InMemoryRecordStore`]: mock patient records with masked-NIK keys
//! - [`resolver::NikResolver`]: NIK extraction from free-text queries
//! - [`scripted::KeywordRoutingGenerator`]: an offline stand-in for the model
//! - [`runtime`]: wiring of catalog, policy, verifier, store and resolver
//!
//! and five demo scenarios (A–E) covering delegation, default fallback,
//! direct replies, degraded analysis and unknown operations.
//!
//! All data is hardcoded and fictional.

pub mod mock_data;
pub mod resolver;
pub mod runtime;
pub mod scenarios;
pub mod scripted;
pub mod store;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use medroute_contracts::{
        conversation::ConversationTurn, delegation::DelegationStatus, handler::HandlerType,
    };
    use medroute_core::{
        session::{Sender, CONNECTIVITY_ERROR_TEXT},
        traits::NoopObserver,
        Session,
    };

    use crate::{runtime::mock_coordinator, scripted::KeywordRoutingGenerator};

    #[test]
    fn test_session_over_mock_runtime() {
        let coordinator = mock_coordinator(Arc::new(KeywordRoutingGenerator::new())).unwrap();
        let mut session = Session::new(coordinator);

        session.send("Halo", &NoopObserver).unwrap();
        session
            .send("Cek tagihan NIK 3273000000", &NoopObserver)
            .unwrap();

        let senders: Vec<Sender> = session.transcript().iter().map(|e| e.sender).collect();
        assert_eq!(
            senders,
            vec![
                Sender::User,
                Sender::Coordinator,
                Sender::User,
                Sender::System,
                Sender::Agent,
                Sender::Coordinator,
            ]
        );
        assert_eq!(session.history().len(), 6);
    }

    #[test]
    fn test_failed_turn_leaves_session_untouched() {
        let generator = KeywordRoutingGenerator::new().with_forced_operation("tidak_ada");
        let coordinator = mock_coordinator(Arc::new(generator)).unwrap();
        let mut session = Session::new(coordinator);

        assert!(session.send("Halo", &NoopObserver).is_err());
        assert!(session.transcript().is_empty());
        assert!(CONNECTIVITY_ERROR_TEXT.starts_with("Error:"));
    }

    #[test]
    fn test_blank_query_delegates_to_default_record() {
        let generator =
            KeywordRoutingGenerator::new().with_forced_operation("panggil_sub_agen_penagihan");
        let coordinator = mock_coordinator(Arc::new(generator)).unwrap();

        let outcome = coordinator.submit_turn(&[], "", &NoopObserver).unwrap();

        assert_eq!(outcome.handler_type, HandlerType::Billing);
        assert_eq!(outcome.tool_used.as_deref(), Some("panggil_sub_agen_penagihan"));
        let delegation = outcome.delegation.unwrap();
        assert_eq!(delegation.status, DelegationStatus::Success);
        assert_eq!(delegation.data_snapshot["name"], "Pasien Umum");
        assert_eq!(delegation.data_snapshot["message"], "Billing data unavailable");
    }

    #[test]
    fn test_same_turn_routes_to_same_operation() {
        let coordinator = mock_coordinator(Arc::new(KeywordRoutingGenerator::new())).unwrap();
        let history = vec![
            ConversationTurn::user("Halo"),
            ConversationTurn::model("Ada yang bisa dibantu?"),
        ];
        let message = "Saya mau lihat hasil lab, NIK 3273000000";

        let first = coordinator.submit_turn(&history, message, &NoopObserver).unwrap();
        let second = coordinator.submit_turn(&history, message, &NoopObserver).unwrap();

        assert_eq!(first.tool_used.as_deref(), Some("panggil_sub_agen_rekam_medis"));
        assert_eq!(first.tool_used, second.tool_used);
        assert_eq!(first.handler_type, second.handler_type);
        assert_eq!(first.final_text, second.final_text);
    }
}
