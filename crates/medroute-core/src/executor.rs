//! The sub-agent executor: runs exactly one handler for one structured call.
//!
//! The executor enforces the delegation model:
//!
//!   Catalog lookup → Argument check → Subject resolution → Store fetch →
//!   Scope → Handler analysis
//!
//! The scoping invariant is structural: the handler's model call is built from
//! the value `ScopePolicy::scope()` returned and nothing else, so a handler can
//! never see a section its rule does not name.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use medroute_contracts::{
    conversation::{ConversationTurn, GenerateRequest, StructuredCall},
    delegation::{DelegationResult, DelegationStatus},
    error::{MedrouteError, MedrouteResult},
    handler::HandlerType,
};

use crate::{
    catalog::{CatalogEntry, ToolCatalog, QUERY_ARGUMENT, SUB_AGENT_TEMPERATURE},
    traits::{ArgumentVerifier, RecordStore, ScopePolicy, SubjectResolver, TextGenerator},
};

/// Analysis text used when the handler's model call returned no text.
pub const EMPTY_ANALYSIS_TEXT: &str = "Sub-agen gagal memproses analisis.";

/// Analysis text used when the handler's model call failed outright.
pub const DEGRADED_ANALYSIS_TEXT: &str =
    "Gagal melakukan analisis cerdas. Mengembalikan data mentah.";

/// Runs one delegated call against the record store.
///
/// Construct one executor per runtime and share it across turns; it holds no
/// per-turn state.
pub struct SubAgentExecutor {
    catalog: Arc<ToolCatalog>,
    generator: Arc<dyn TextGenerator>,
    store: Box<dyn RecordStore>,
    scope: Box<dyn ScopePolicy>,
    resolver: Box<dyn SubjectResolver>,
    verifier: Box<dyn ArgumentVerifier>,
}

impl SubAgentExecutor {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        generator: Arc<dyn TextGenerator>,
        store: Box<dyn RecordStore>,
        scope: Box<dyn ScopePolicy>,
        resolver: Box<dyn SubjectResolver>,
        verifier: Box<dyn ArgumentVerifier>,
    ) -> Self {
        Self {
            catalog,
            generator,
            store,
            scope,
            resolver,
            verifier,
        }
    }

    /// Execute the operation `operation` with `arguments`.
    ///
    /// # Pipeline
    ///
    /// 1. Resolve the catalog entry; unknown names fail with `UnknownOperation`
    /// 2. Verify `arguments` against the declaration schema
    /// 3. Resolve the subject from the query (never fails)
    /// 4. Fetch the record (sentinel default when unmatched)
    /// 5. Scope the record to the handler's section(s)
    /// 6. Ask the handler's model for an analysis; failures degrade to a
    ///    placeholder and are never returned as errors
    ///
    /// # Errors
    ///
    /// `UnknownOperation` and `InvalidArguments` only. Both are fatal for the
    /// turn and are not retried.
    pub fn execute(
        &self,
        operation: &str,
        arguments: &Value,
    ) -> MedrouteResult<(DelegationResult, HandlerType)> {
        // ── Step 1: Catalog lookup ───────────────────────────────────────────
        let entry = self.catalog.entry_for_operation(operation).ok_or_else(|| {
            warn!(operation = %operation, "decision capability requested unknown operation");
            MedrouteError::UnknownOperation {
                name: operation.to_string(),
            }
        })?;
        let handler = entry.handler;

        // ── Step 2: Argument verification ────────────────────────────────────
        let call = StructuredCall {
            name: operation.to_string(),
            arguments: arguments.clone(),
        };
        let report = self.verifier.verify(&call, &entry.declaration)?;
        if !report.passed {
            let reason = report.summary();
            warn!(operation = %operation, failures = %reason, "structured call arguments rejected");
            return Err(MedrouteError::InvalidArguments {
                operation: operation.to_string(),
                reason,
            });
        }
        let query = arguments[QUERY_ARGUMENT].as_str().ok_or_else(|| {
            MedrouteError::InvalidArguments {
                operation: operation.to_string(),
                reason: format!("'{QUERY_ARGUMENT}' must be a string"),
            }
        })?;

        // ── Steps 3 & 4: Subject resolution and fetch ────────────────────────
        let subject = self.resolver.resolve(query);
        let resolved = self.store.lookup(&subject);
        debug!(
            operation = %operation,
            handler = %handler,
            subject = %resolved.key,
            default_subject = resolved.is_default(),
            "subject resolved"
        );

        // ── Step 5: Scoping ──────────────────────────────────────────────────
        let snapshot = self.scope.scope(handler, &resolved.record)?;

        // ── Step 6: Handler analysis ─────────────────────────────────────────
        let analysis = self.analyze(entry, &snapshot, query);

        info!(handler = %handler, subject = %resolved.key, "sub-agent finished");

        Ok((
            DelegationResult {
                status: DelegationStatus::Success,
                analysis,
                data_snapshot: snapshot,
            },
            handler,
        ))
    }

    /// Run the handler-specific model call over the scoped snapshot.
    fn analyze(&self, entry: &CatalogEntry, snapshot: &Value, query: &str) -> String {
        let request = GenerateRequest {
            system_directive: entry.directive.clone(),
            tools: Vec::new(),
            temperature: Some(SUB_AGENT_TEMPERATURE),
            contents: vec![ConversationTurn::user(analysis_prompt(snapshot, query))],
        };

        match self.generator.generate(&request) {
            Ok(response) => response
                .text()
                .unwrap_or_else(|| EMPTY_ANALYSIS_TEXT.to_string()),
            Err(e) => {
                warn!(handler = %entry.handler, error = %e, "sub-agent analysis failed, returning raw data");
                DEGRADED_ANALYSIS_TEXT.to_string()
            }
        }
    }
}

/// The prompt a handler's model receives: the snapshot, the verbatim query,
/// and an instruction to answer for the coordinator.
pub fn analysis_prompt(snapshot: &Value, query: &str) -> String {
    let data = serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| snapshot.to_string());
    format!(
        "DATA MENTAH DARI DATABASE SISTEM:\n{data}\n\n\
         PERMINTAAN SPESIFIK PENGGUNA:\n\"{query}\"\n\n\
         INSTRUKSI: Sebagai sub-agen khusus, analisislah data di atas untuk menjawab permintaan pengguna. \
         Berikan jawaban yang siap diteruskan oleh Koordinator."
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────
