//! Delegation records and the chained events that wrap them.
//!
//! A `DelegationRecord` is what the observer captures from the runtime. An
//! `AuditEvent` places that record in the hash chain, and an `AuditLog` is
//! the exported copy of a whole session's chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use medroute_contracts::{
    delegation::{DelegationResult, DelegationStatus},
    handler::{HandlerType, SessionId},
};

/// The two observable transitions of a delegated turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DelegationEventKind {
    Started {
        operation: String,
    },
    Completed {
        handler: HandlerType,
        status: DelegationStatus,
        /// The data slice the handler saw. The narrative itself is not
        /// recorded.
        source_data_snapshot: Value,
    },
}

/// One captured delegation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationRecord {
    #[serde(flatten)]
    pub kind: DelegationEventKind,
    pub timestamp: DateTime<Utc>,
}

impl DelegationRecord {
    pub fn started(operation: &str) -> Self {
        Self {
            kind: DelegationEventKind::Started {
                operation: operation.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn completed(result: &DelegationResult, handler: HandlerType) -> Self {
        Self {
            kind: DelegationEventKind::Completed {
                handler,
                status: result.status,
                source_data_snapshot: result.data_snapshot.clone(),
            },
            timestamp: Utc::now(),
        }
    }
}

/// A single link in a session's hash chain.
///
/// Changing any field, including those of the embedded `record`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub session_id: SessionId,

    pub record: DelegationRecord,

    /// `this_hash` of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// SHA-256 (hex) over session id, sequence, prev_hash and the record.
    pub this_hash: String,
}

impl AuditEvent {
    /// `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported copy of a session's chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub session_id: SessionId,

    /// Events in chain order.
    pub events: Vec<AuditEvent>,

    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last event. Empty when the log is empty.
    pub terminal_hash: String,
}
