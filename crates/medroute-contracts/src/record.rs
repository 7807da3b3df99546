//! Subject records and the keys used to look them up.
//!
//! A record is partitioned into independent sections. Each handler type may
//! only read the section(s) its scoping rule names; the record itself is
//! read-only and never created or mutated by the runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store key of the sentinel record returned for unmatched identifiers.
pub const DEFAULT_SUBJECT_KEY: &str = "default";

/// The independently scoped parts of a subject record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Identity,
    Clinical,
    Scheduling,
    Billing,
}

impl Section {
    /// The key this section is stored under in serialized records.
    pub fn wire_key(self) -> &'static str {
        match self {
            Section::Identity => "biodata",
            Section::Clinical => "medical_history",
            Section::Scheduling => "appointments",
            Section::Billing => "billing",
        }
    }
}

/// The stored data for one identified person.
///
/// Sections are optional: the sentinel record carries none of them and only
/// has free-form top-level fields (kept in `extra`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    #[serde(rename = "biodata", default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Value>,
    #[serde(rename = "medical_history", default, skip_serializing_if = "Option::is_none")]
    pub clinical: Option<Value>,
    #[serde(rename = "appointments", default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Value>,
    /// Top-level fields that belong to no section.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubjectRecord {
    /// Borrow one section, or `None` if the record does not carry it.
    pub fn section(&self, section: Section) -> Option<&Value> {
        let value = match section {
            Section::Identity => self.identity.as_ref(),
            Section::Clinical => self.clinical.as_ref(),
            Section::Scheduling => self.scheduling.as_ref(),
            Section::Billing => self.billing.as_ref(),
        };
        value.filter(|v| !v.is_null())
    }

    /// The subject's display name from the identity section.
    pub fn display_name(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .and_then(|identity| identity.get("name"))
            .and_then(Value::as_str)
    }

    /// The record serialized as a single JSON object.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// The outcome of subject resolution on a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKey {
    /// An identifier (or recognised token) extracted from the query text.
    Id(String),
    /// Nothing usable was found; the sentinel record applies.
    Default,
}

/// A record as returned by the store together with the key it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSubject {
    /// The store key that matched, or `DEFAULT_SUBJECT_KEY`.
    pub key: String,
    pub record: SubjectRecord,
}

impl ResolvedSubject {
    pub fn is_default(&self) -> bool {
        self.key == DEFAULT_SUBJECT_KEY
    }
}
