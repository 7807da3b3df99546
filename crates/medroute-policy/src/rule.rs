//! Scope rule types and configuration schema.
//!
//! A `ScopeConfig` is deserialized from TOML and holds one `ScopeRule` per
//! delegable handler. Unlike an access policy there is no rule ordering: each
//! handler has exactly one rule, checked when the policy is loaded.

use serde::{Deserialize, Serialize};

use medroute_contracts::{handler::HandlerType, record::Section};

/// Handler names as written in TOML (kebab-case).
///
/// Example:
/// ```toml
/// handler = "medical-records"
/// handler = "billing"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeHandler {
    Coordinator,
    MedicalRecords,
    PatientManagement,
    Appointment,
    Billing,
}

impl From<ScopeHandler> for HandlerType {
    fn from(handler: ScopeHandler) -> Self {
        match handler {
            ScopeHandler::Coordinator => HandlerType::Coordinator,
            ScopeHandler::MedicalRecords => HandlerType::MedicalRecords,
            ScopeHandler::PatientManagement => HandlerType::PatientManagement,
            ScopeHandler::Appointment => HandlerType::Appointment,
            ScopeHandler::Billing => HandlerType::Billing,
        }
    }
}

/// What one handler may see of a subject record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRule {
    /// Stable identifier used in logs and error messages.
    pub id: String,

    /// Human-readable explanation of what this rule exposes.
    pub description: String,

    pub handler: ScopeHandler,

    /// The only record section exposed to the handler.
    pub section: Section,

    /// Add the subject's display name (`name`) next to the section fields.
    /// Nothing else from the identity section is merged.
    #[serde(default)]
    pub merge_display_name: bool,

    /// Message to report when the section is missing or an empty list.
    pub absent_message: Option<String>,
}

/// The top-level structure deserialized from a TOML scoping policy.
///
/// Example:
/// ```toml
/// [[scopes]]
/// id = "billing-billing"
/// description = "Invoices and insurance coverage"
/// handler = "billing"
/// section = "billing"
/// absent_message = "Billing data unavailable"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub scopes: Vec<ScopeRule>,
}
