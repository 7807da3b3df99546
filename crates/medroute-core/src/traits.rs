//! Core trait definitions for the MEDROUTE delegation pipeline.
//!
//! These traits define every seam between the orchestration logic and the
//! outside world:
//!
//! - `TextGenerator`: opaque decision/narration capability (an LLM)
//! - `RecordStore`: read-only subject data
//! - `SubjectResolver`: best-effort identifier extraction from a query
//! - `ScopePolicy`: what slice of a record each handler may see
//! - `ArgumentVerifier`: schema check of a structured call's arguments
//! - `DelegationObserver`: the two events the runtime publishes
//!
//! The coordinator and executor only ever talk to these traits, so tests can
//! swap every external collaborator for a deterministic stub.

use serde_json::Value;

use medroute_contracts::{
    conversation::{GenerateRequest, GenerateResponse, StructuredCall, ToolDeclaration},
    delegation::DelegationResult,
    error::MedrouteResult,
    handler::HandlerType,
    record::{ResolvedSubject, SubjectKey, SubjectRecord},
    verify::VerificationReport,
};

/// A stateless, potentially failing text-generation capability.
///
/// Implementations are **untrusted**: the runtime only relies on the shape of
/// the response, never on its content.
pub trait TextGenerator: Send + Sync {
    /// Send one request and return the first candidate's parts.
    ///
    /// Any transport, auth or quota failure must be reported as an error; the
    /// caller decides whether that aborts the turn.
    fn generate(&self, request: &GenerateRequest) -> MedrouteResult<GenerateResponse>;
}

/// Read-only lookup from a subject key to a record.
///
/// Lookups never fail: an unknown identifier yields the sentinel default
/// record.
pub trait RecordStore: Send + Sync {
    fn lookup(&self, subject: &SubjectKey) -> ResolvedSubject;
}

/// Strategy for pulling a subject identifier out of free text.
///
/// Resolution is best-effort. Ambiguous or malformed input resolves to
/// `SubjectKey::Default` rather than an error.
pub trait SubjectResolver: Send + Sync {
    fn resolve(&self, query: &str) -> SubjectKey;
}

/// Decides which part of a record a handler is allowed to see.
///
/// Implementations are **trusted** and must be deterministic. The returned
/// value is exactly what the handler's model call and the coordinator see.
pub trait ScopePolicy: Send + Sync {
    /// Return the data slice `handler` may read from `record`.
    ///
    /// Errors only when no rule exists for `handler`, which a validated policy
    /// rules out at load time.
    fn scope(&self, handler: HandlerType, record: &SubjectRecord) -> MedrouteResult<Value>;
}

/// Checks a structured call's arguments against its declaration.
pub trait ArgumentVerifier: Send + Sync {
    /// Return a report with `passed = false` and populated `failures` when the
    /// arguments do not satisfy `declaration.parameters`.
    fn verify(
        &self,
        call: &StructuredCall,
        declaration: &ToolDeclaration,
    ) -> MedrouteResult<VerificationReport>;
}

/// Receives the two externally observable transitions of a delegated turn.
///
/// Notifications are fire-and-forget: implementations must not fail the turn
/// and the coordinator does not wait on anything they start.
pub trait DelegationObserver {
    /// The coordinator chose `operation` and is about to run the sub-agent.
    fn on_delegation_start(&self, _operation: &str) {}

    /// The sub-agent finished.
    fn on_delegation_complete(&self, _result: &DelegationResult, _handler: HandlerType) {}
}

/// An observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DelegationObserver for NoopObserver {}
