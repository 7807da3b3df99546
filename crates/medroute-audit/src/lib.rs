//! # medroute-audit
//!
//! Append-only, SHA-256 hash-chained record of delegation events.
//!
//! [`AuditObserver`] plugs into the coordinator as a `DelegationObserver` and
//! links each start/complete notification onto an [`InMemoryAuditTrail`].
//! Editing any stored event breaks the chain, which [`verify_chain`] detects.
//!
//! ```rust,ignore
//! use medroute_audit::{AuditObserver, InMemoryAuditTrail};
//!
//! let trail = InMemoryAuditTrail::new(session.id());
//! let observer = AuditObserver::new(trail.clone());
//! session.send("Cek tagihan saya", &observer)?;
//! assert!(trail.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod memory;
pub mod observer;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog, DelegationEventKind, DelegationRecord};
pub use memory::InMemoryAuditTrail;
pub use observer::AuditObserver;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use medroute_contracts::{
        delegation::{DelegationResult, DelegationStatus},
        handler::{HandlerType, SessionId},
    };
    use medroute_core::traits::DelegationObserver;

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_result(snapshot: serde_json::Value) -> DelegationResult {
        DelegationResult {
            status: DelegationStatus::Success,
            analysis: "Leukosit sedikit tinggi.".to_string(),
            data_snapshot: snapshot,
        }
    }

    fn filled_trail() -> InMemoryAuditTrail {
        let trail = InMemoryAuditTrail::new(SessionId::new());
        trail
            .append(DelegationRecord::started("panggil_sub_agen_rekam_medis"))
            .unwrap();
        trail
            .append(DelegationRecord::completed(
                &make_result(json!({ "diagnosis": "Bronkitis Akut" })),
                HandlerType::MedicalRecords,
            ))
            .unwrap();
        trail
            .append(DelegationRecord::started("panggil_sub_agen_penagihan"))
            .unwrap();
        trail
    }

    // ── Chain ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let trail = filled_trail();
        assert_eq!(trail.len(), 3);
        assert!(trail.verify_integrity());
    }

    #[test]
    fn test_tamper_detection() {
        let trail = filled_trail();
        {
            let mut state = trail.state.lock().unwrap();
            state.events[1].record.kind = DelegationEventKind::Completed {
                handler: HandlerType::Billing,
                status: DelegationStatus::Success,
                source_data_snapshot: json!({ "total_outstanding": 0 }),
            };
        }

        assert!(!trail.verify_integrity());
    }

    #[test]
    fn test_reordered_events_fail_verification() {
        let mut log = filled_trail().export_log().unwrap();
        log.events.swap(0, 1);

        assert!(!verify_chain(&log.events));
    }

    #[test]
    fn test_genesis_and_sequence() {
        let log = filled_trail().export_log().unwrap();

        assert_eq!(log.events[0].prev_hash, AuditEvent::GENESIS_HASH);
        for (idx, event) in log.events.iter().enumerate() {
            assert_eq!(event.sequence, idx as u64);
        }
        assert_eq!(log.terminal_hash, log.events[2].this_hash);
        assert!(verify_chain(&log.events));
    }

    #[test]
    fn test_empty_trail() {
        let trail = InMemoryAuditTrail::new(SessionId::new());
        assert!(trail.is_empty());
        assert!(trail.verify_integrity());
        assert_eq!(trail.export_log().unwrap().terminal_hash, "");
    }

    #[test]
    fn test_record_serializes_with_event_tag() {
        let record = DelegationRecord::started("panggil_sub_agen_penjadwal");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["event"], "started");
        assert_eq!(value["operation"], "panggil_sub_agen_penjadwal");
        assert!(value.get("timestamp").is_some());
    }

    // ── Observer ──────────────────────────────────────────────────────────────

    #[test]
    fn test_observer_records_start_then_completion() {
        let trail = InMemoryAuditTrail::new(SessionId::new());
        let observer = AuditObserver::new(trail.clone());

        observer.on_delegation_start("panggil_sub_agen_penagihan");
        observer.on_delegation_complete(
            &make_result(json!({ "total_outstanding": 150000 })),
            HandlerType::Billing,
        );

        let log = trail.export_log().unwrap();
        assert_eq!(log.events.len(), 2);
        match &log.events[0].record.kind {
            DelegationEventKind::Started { operation } => {
                assert_eq!(operation, "panggil_sub_agen_penagihan");
            }
            other => panic!("expected Started, got {:?}", other),
        }
        match &log.events[1].record.kind {
            DelegationEventKind::Completed {
                handler,
                source_data_snapshot,
                ..
            } => {
                assert_eq!(*handler, HandlerType::Billing);
                assert_eq!(source_data_snapshot["total_outstanding"], 150000);
            }
            other => panic!("expected Completed, got {:?}", other),
        }
        assert!(observer.trail().verify_integrity());
    }
}
