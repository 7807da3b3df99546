//! Schema-based argument verifier for structured calls.
//!
//! `SchemaArgumentVerifier` implements the `ArgumentVerifier` trait from
//! `medroute-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the call's `arguments` are validated against the
//!    declaration's `parameters` JSON Schema using the `jsonschema` crate.
//!    Each declaration's schema is compiled once and reused until the
//!    declaration under that operation name changes.
//! 2. **Semantic**: every registered rule is evaluated in order. All failures
//!    are collected before returning so logs show the full failure set.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, warn};

use medroute_contracts::{
    conversation::{StructuredCall, ToolDeclaration},
    error::{MedrouteError, MedrouteResult},
    verify::{VerificationFailure, VerificationReport},
};
use medroute_core::{catalog::QUERY_ARGUMENT, traits::ArgumentVerifier};

/// Rule id used for every structural failure.
pub const JSON_SCHEMA_RULE: &str = "json-schema";

/// Rule id of the opt-in check that rejects blank queries.
pub const NON_EMPTY_QUERY_RULE: &str = "non-empty-query";

/// A semantic check over a call's arguments.
///
/// Returns `Some(message)` when the check fails, `None` on success.
pub type ArgumentRuleFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// A declaration's schema together with its compiled validator.
struct CompiledSchema {
    schema: Value,
    validator: Arc<Validator>,
}

/// The MEDROUTE argument verifier.
///
/// A blank query is valid by default: it resolves to the default subject
/// downstream. Callers that want blank queries rejected opt in with
/// [`SchemaArgumentVerifier::with_non_empty_query`].
pub struct SchemaArgumentVerifier {
    rules: Vec<(String, ArgumentRuleFn)>,
    compiled: Mutex<HashMap<String, CompiledSchema>>,
}

impl SchemaArgumentVerifier {
    /// A verifier with structural validation only.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            compiled: Mutex::new(HashMap::new()),
        }
    }

    /// Structural validation plus the `non-empty-query` rule.
    pub fn with_non_empty_query() -> Self {
        let mut verifier = Self::new();
        verifier.register_rule(NON_EMPTY_QUERY_RULE, Box::new(non_empty_query));
        verifier
    }

    /// Register a semantic rule under `rule_id`. Registering the same id twice
    /// replaces the previous function.
    pub fn register_rule(&mut self, rule_id: impl Into<String>, f: ArgumentRuleFn) {
        let rule_id = rule_id.into();
        match self.rules.iter_mut().find(|(id, _)| *id == rule_id) {
            Some(slot) => slot.1 = f,
            None => self.rules.push((rule_id, f)),
        }
    }

    /// Number of schemas currently held in compiled form.
    pub fn compiled_count(&self) -> usize {
        self.compiled.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// The compiled validator for `declaration`, compiling it on first use or
    /// when the declaration's schema has changed.
    fn validator(
        &self,
        declaration: &ToolDeclaration,
    ) -> MedrouteResult<Result<Arc<Validator>, String>> {
        let mut compiled = self.compiled.lock().map_err(|e| MedrouteError::SchemaValidation {
            reason: format!("compiled schema cache poisoned: {e}"),
        })?;

        if let Some(entry) = compiled.get(&declaration.name) {
            if entry.schema == declaration.parameters {
                return Ok(Ok(Arc::clone(&entry.validator)));
            }
        }

        match jsonschema::validator_for(&declaration.parameters) {
            Ok(validator) => {
                debug!(operation = %declaration.name, "argument schema compiled");
                let validator = Arc::new(validator);
                compiled.insert(
                    declaration.name.clone(),
                    CompiledSchema {
                        schema: declaration.parameters.clone(),
                        validator: Arc::clone(&validator),
                    },
                );
                Ok(Ok(validator))
            }
            Err(e) => Ok(Err(e.to_string())),
        }
    }

    fn structural_failures(
        &self,
        arguments: &Value,
        declaration: &ToolDeclaration,
    ) -> MedrouteResult<Vec<VerificationFailure>> {
        if declaration.parameters.is_null() {
            return Ok(Vec::new());
        }

        let failures = match self.validator(declaration)? {
            Ok(validator) => validator
                .iter_errors(arguments)
                .map(|error| {
                    let message = format!(
                        "JSON Schema violation at {}: {}",
                        error.instance_path, error
                    );
                    warn!(operation = %declaration.name, %message, "structural validation failure");
                    VerificationFailure {
                        rule_id: JSON_SCHEMA_RULE.to_string(),
                        message,
                    }
                })
                .collect(),
            Err(e) => {
                let message = format!("invalid JSON Schema document: {e}");
                warn!(operation = %declaration.name, %message, "schema compilation failure");
                vec![VerificationFailure {
                    rule_id: JSON_SCHEMA_RULE.to_string(),
                    message,
                }]
            }
        };
        Ok(failures)
    }
}

impl Default for SchemaArgumentVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentVerifier for SchemaArgumentVerifier {
    fn verify(
        &self,
        call: &StructuredCall,
        declaration: &ToolDeclaration,
    ) -> MedrouteResult<VerificationReport> {
        let mut failures = Vec::new();

        if call.name != declaration.name {
            failures.push(VerificationFailure {
                rule_id: "operation-name".to_string(),
                message: format!(
                    "call names '{}' but was checked against '{}'",
                    call.name, declaration.name
                ),
            });
        }

        failures.extend(self.structural_failures(&call.arguments, declaration)?);

        for (rule_id, rule) in &self.rules {
            if let Some(message) = rule(&call.arguments) {
                warn!(rule_id = %rule_id, operation = %call.name, %message, "argument rule failed");
                failures.push(VerificationFailure {
                    rule_id: rule_id.clone(),
                    message,
                });
            }
        }

        let report = VerificationReport::from_failures(failures);
        debug!(
            operation = %call.name,
            passed = report.passed,
            failure_count = report.failures.len(),
            "argument verification complete"
        );
        Ok(report)
    }
}

/// Fails when the query argument is present but blank. A missing or
/// non-string query is left to the structural phase.
fn non_empty_query(arguments: &Value) -> Option<String> {
    match arguments.get(QUERY_ARGUMENT).and_then(Value::as_str) {
        Some(query) if query.trim().is_empty() => {
            Some(format!("'{QUERY_ARGUMENT}' must not be blank"))
        }
        _ => None,
    }
}
