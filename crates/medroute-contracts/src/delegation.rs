//! Delegation results and turn outcomes.
//!
//! `DelegationResult` is what a sub-agent hands back to the coordinator; it is
//! created once per delegated call and dropped when the turn ends.
//! `TurnOutcome` is what the coordinator returns to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::handler::{HandlerType, TurnId};

/// Whether the sub-agent produced a usable result.
///
/// The runtime only ever produces `Success`: fetch and scoping problems degrade
/// to defaults instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegationStatus {
    Success,
    Failure,
}

/// The sub-agent's answer for one delegated call.
///
/// Serialized with the field names the coordinator model sees in the
/// function-result turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationResult {
    pub status: DelegationStatus,
    /// Narrative produced by the handler-specific model call, or a fixed
    /// placeholder when that call failed.
    #[serde(rename = "agent_analysis")]
    pub analysis: String,
    /// The exact data slice the handler was given.
    #[serde(rename = "source_data_snapshot")]
    pub data_snapshot: Value,
}

/// The result of one coordinator turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn_id: TurnId,
    /// The reply to show the user.
    pub final_text: String,
    /// The operation name that was invoked, if the turn was delegated.
    pub tool_used: Option<String>,
    /// `Coordinator` when no delegation happened.
    pub handler_type: HandlerType,
    /// The sub-agent result, if the turn was delegated.
    pub delegation: Option<DelegationResult>,
}

impl TurnOutcome {
    /// False when the coordinator answered directly (a policy violation the
    /// caller may want to render differently).
    pub fn is_delegated(&self) -> bool {
        self.handler_type.is_delegable()
    }
}
