//! `DelegationObserver` that feeds the audit trail.

use tracing::warn;

use medroute_contracts::{delegation::DelegationResult, handler::HandlerType};
use medroute_core::traits::DelegationObserver;

use crate::{event::DelegationRecord, memory::InMemoryAuditTrail};

/// Appends every start/complete notification to an `InMemoryAuditTrail`.
///
/// Append failures are logged and swallowed so a broken trail never fails
/// a turn.
pub struct AuditObserver {
    trail: InMemoryAuditTrail,
}

impl AuditObserver {
    pub fn new(trail: InMemoryAuditTrail) -> Self {
        Self { trail }
    }

    pub fn trail(&self) -> &InMemoryAuditTrail {
        &self.trail
    }

    fn record(&self, record: DelegationRecord) {
        if let Err(e) = self.trail.append(record) {
            warn!(session = %self.trail.session_id(), error = %e, "audit append failed");
        }
    }
}

impl DelegationObserver for AuditObserver {
    fn on_delegation_start(&self, operation: &str) {
        self.record(DelegationRecord::started(operation));
    }

    fn on_delegation_complete(&self, result: &DelegationResult, handler: HandlerType) {
        self.record(DelegationRecord::completed(result, handler));
    }
}
