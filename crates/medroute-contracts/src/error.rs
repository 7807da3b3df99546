//! Runtime error types for the MEDROUTE delegation pipeline.
//!
//! All fallible operations return `MedrouteResult<T>`. Only the variants that
//! abort a turn ever reach the caller of `Coordinator::submit_turn`; degraded
//! analysis and ambiguous subject resolution are recovered locally.

use thiserror::Error;

/// The unified error type for the MEDROUTE runtime.
#[derive(Debug, Error)]
pub enum MedrouteError {
    /// The decision capability requested an operation outside the tool catalog.
    #[error("unknown operation '{name}' requested")]
    UnknownOperation { name: String },

    /// A structured call's arguments do not satisfy the declaration's schema.
    #[error("invalid arguments for operation '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },

    /// A coordinator-stage text-generation call failed (network, auth, quota).
    #[error("text-generation capability unavailable: {reason}")]
    CapabilityUnavailable { reason: String },

    /// A required configuration value, policy document or data file is invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A JSON Schema document could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// The audit trail could not record an event.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },
}

impl MedrouteError {
    /// True for errors that end a turn without a reply.
    ///
    /// Configuration and schema errors are raised at startup; audit failures
    /// are logged by observers and never reach a turn.
    pub fn aborts_turn(&self) -> bool {
        matches!(
            self,
            MedrouteError::UnknownOperation { .. }
                | MedrouteError::InvalidArguments { .. }
                | MedrouteError::CapabilityUnavailable { .. }
        )
    }
}

/// Convenience alias used throughout the MEDROUTE crates.
pub type MedrouteResult<T> = Result<T, MedrouteError>;
