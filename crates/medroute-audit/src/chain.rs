//! Hashing and chain verification.
//!
//! Hash input layout (bytes, in order):
//!   1. session id as its hyphenated UTF-8 string
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the record

use sha2::{Digest, Sha256};

use medroute_contracts::{
    error::{MedrouteError, MedrouteResult},
    handler::SessionId,
};

use crate::event::{AuditEvent, DelegationRecord};

/// Compute the lowercase hex SHA-256 for one chain link.
pub fn hash_event(
    session_id: &SessionId,
    sequence: u64,
    record: &DelegationRecord,
    prev_hash: &str,
) -> MedrouteResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| MedrouteError::AuditWriteFailed {
        reason: format!("delegation record is not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(session_id.to_string().as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Check prev-hash linkage and recompute every hash. An empty chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.session_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
