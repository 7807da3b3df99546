//! In-memory hash-chained trail.
//!
//! `InMemoryAuditTrail` is cheap to clone: clones share one chain, so the
//! demo can hand one to an `AuditObserver` and keep another to export the log.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use medroute_contracts::{
    error::{MedrouteError, MedrouteResult},
    handler::SessionId,
};

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog, DelegationRecord},
};

pub(crate) struct TrailState {
    pub(crate) events: Vec<AuditEvent>,
    pub(crate) last_hash: String,
}

#[derive(Clone)]
pub struct InMemoryAuditTrail {
    session_id: SessionId,
    pub(crate) state: Arc<Mutex<TrailState>>,
}

impl InMemoryAuditTrail {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: Arc::new(Mutex::new(TrailState {
                events: Vec::new(),
                last_hash: AuditEvent::GENESIS_HASH.to_string(),
            })),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Link `record` onto the end of the chain.
    pub fn append(&self, record: DelegationRecord) -> MedrouteResult<()> {
        let mut state = self.state.lock().map_err(|e| MedrouteError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })?;

        let sequence = state.events.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_event(&self.session_id, sequence, &record, &prev_hash)?;

        debug!(session = %self.session_id, sequence, hash = %this_hash, "delegation event chained");

        state.events.push(AuditEvent {
            sequence,
            session_id: self.session_id,
            record,
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the chain into an `AuditLog`.
    pub fn export_log(&self) -> MedrouteResult<AuditLog> {
        let state = self.state.lock().map_err(|e| MedrouteError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })?;

        Ok(AuditLog {
            session_id: self.session_id,
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash: state
                .events
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        })
    }

    /// False when the chain was altered in memory or the lock is poisoned.
    pub fn verify_integrity(&self) -> bool {
        self.state
            .lock()
            .map(|state| verify_chain(&state.events))
            .unwrap_or(false)
    }
}
