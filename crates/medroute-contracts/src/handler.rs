//! Handler identity and turn/session identifiers.
//!
//! A `HandlerType` names one data domain a sub-agent is scoped to. The
//! coordinator itself is represented as `HandlerType::Coordinator` so a turn
//! that was answered without delegation can still be tagged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The specialized processor a turn was routed to.
///
/// `Coordinator` is never a delegation target; it is the classification of a
/// turn in which no structured call occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandlerType {
    Coordinator,
    MedicalRecords,
    PatientManagement,
    Appointment,
    Billing,
}

impl HandlerType {
    /// Every handler that may be the target of a delegation, in catalog order.
    pub const DELEGABLE: [HandlerType; 4] = [
        HandlerType::MedicalRecords,
        HandlerType::PatientManagement,
        HandlerType::Appointment,
        HandlerType::Billing,
    ];

    /// Return true for every variant except `Coordinator`.
    pub fn is_delegable(self) -> bool {
        !matches!(self, HandlerType::Coordinator)
    }

    /// Stable upper-case label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerType::Coordinator => "COORDINATOR",
            HandlerType::MedicalRecords => "MEDICAL_RECORDS",
            HandlerType::PatientManagement => "PATIENT_MANAGEMENT",
            HandlerType::Appointment => "APPOINTMENT",
            HandlerType::Billing => "BILLING",
        }
    }
}

impl fmt::Display for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for one coordinator turn.
///
/// Appears in every log line emitted while the turn runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub uuid::Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
