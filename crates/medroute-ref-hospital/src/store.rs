//! In-memory `RecordStore` over a JSON record table.
//!
//! Keys are either exact subject ids or masked ids: a key containing `x`
//! matches any id that starts with the part before the first `x`. A lookup
//! tries the exact key first, then the masked key with the longest prefix,
//! then falls back to the `default` record.

use std::collections::BTreeMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use medroute_contracts::{
    error::{MedrouteError, MedrouteResult},
    record::{ResolvedSubject, SubjectKey, SubjectRecord, DEFAULT_SUBJECT_KEY},
};
use medroute_core::traits::RecordStore;

use crate::mock_data::hospital_records;

const MASK_CHAR: char = 'x';

#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    records: BTreeMap<String, SubjectRecord>,
    latency: Duration,
}

impl InMemoryRecordStore {
    /// Build a store from a JSON object of `key → record`. The object must
    /// contain a `default` entry.
    pub fn from_value(table: Value) -> MedrouteResult<Self> {
        let records: BTreeMap<String, SubjectRecord> =
            serde_json::from_value(table).map_err(|e| MedrouteError::ConfigError {
                reason: format!("invalid record table: {}", e),
            })?;

        if !records.contains_key(DEFAULT_SUBJECT_KEY) {
            return Err(MedrouteError::ConfigError {
                reason: format!("record table has no '{}' entry", DEFAULT_SUBJECT_KEY),
            });
        }

        Ok(Self {
            records,
            latency: Duration::ZERO,
        })
    }

    pub fn from_json_str(s: &str) -> MedrouteResult<Self> {
        let table: Value = serde_json::from_str(s).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to parse record table JSON: {}", e),
        })?;
        Self::from_value(table)
    }

    pub fn from_file(path: &Path) -> MedrouteResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to read record table '{}': {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    /// The built-in mock hospital records.
    pub fn hospital() -> MedrouteResult<Self> {
        Self::from_value(hospital_records())
    }

    /// Sleep for `latency` on every lookup, simulating a remote fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching_key(&self, id: &str) -> Option<&str> {
        if let Some((key, _)) = self.records.get_key_value(id) {
            return Some(key.as_str());
        }

        self.records
            .keys()
            .filter_map(|key| {
                let prefix_len = key.find(MASK_CHAR)?;
                let prefix = &key[..prefix_len];
                (!prefix.is_empty() && id.starts_with(prefix)).then_some((prefix_len, key))
            })
            .max_by_key(|(prefix_len, _)| *prefix_len)
            .map(|(_, key)| key.as_str())
    }

    fn resolved(&self, key: &str) -> ResolvedSubject {
        ResolvedSubject {
            key: key.to_string(),
            record: self.records.get(key).cloned().unwrap_or_default(),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn lookup(&self, subject: &SubjectKey) -> ResolvedSubject {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let key = match subject {
            SubjectKey::Id(id) => self.matching_key(id).unwrap_or(DEFAULT_SUBJECT_KEY),
            SubjectKey::Default => DEFAULT_SUBJECT_KEY,
        };
        debug!(subject = ?subject, key = %key, "record lookup");
        self.resolved(key)
    }
}
