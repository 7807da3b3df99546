//! # medroute-verify
//!
//! Argument verification for MEDROUTE structured calls.
//!
//! [`SchemaArgumentVerifier`] checks a call's arguments against the JSON
//! Schema of its tool declaration, then runs any registered semantic rules.
//! A failing report stops the delegation before any record is read.

pub mod engine;

pub use engine::{
    ArgumentRuleFn, SchemaArgumentVerifier, JSON_SCHEMA_RULE, NON_EMPTY_QUERY_RULE,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use medroute_contracts::conversation::{StructuredCall, ToolDeclaration};
    use medroute_core::{catalog::query_parameters, traits::ArgumentVerifier, ToolCatalog};

    use super::*;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn make_declaration(name: &str) -> ToolDeclaration {
        ToolDeclaration {
            name: name.to_string(),
            description: "test operation".to_string(),
            parameters: query_parameters("the user's request"),
        }
    }

    fn make_call(name: &str, arguments: Value) -> StructuredCall {
        StructuredCall {
            name: name.to_string(),
            arguments,
        }
    }

    // ── Structural phase ──────────────────────────────────────────────────────

    #[test]
    fn test_valid_arguments_pass() {
        let verifier = SchemaArgumentVerifier::with_non_empty_query();
        let call = make_call("op", json!({ "permintaan_pengguna": "Cek tagihan saya" }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(report.passed, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_missing_query_fails_schema() {
        let verifier = SchemaArgumentVerifier::with_non_empty_query();
        let call = make_call("op", json!({}));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, JSON_SCHEMA_RULE);
    }

    #[test]
    fn test_non_string_query_fails_schema() {
        let verifier = SchemaArgumentVerifier::with_non_empty_query();
        let call = make_call("op", json!({ "permintaan_pengguna": 42 }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(!report.passed);
        assert!(report.failures.iter().all(|f| f.rule_id == JSON_SCHEMA_RULE));
    }

    #[test]
    fn test_null_parameters_skip_structural_phase() {
        let verifier = SchemaArgumentVerifier::new();
        let declaration = ToolDeclaration {
            name: "op".to_string(),
            description: String::new(),
            parameters: Value::Null,
        };

        let report = verifier.verify(&make_call("op", json!("anything")), &declaration).unwrap();

        assert!(report.passed);
    }

    #[test]
    fn test_malformed_schema_is_reported_as_failure() {
        let verifier = SchemaArgumentVerifier::new();
        let declaration = ToolDeclaration {
            name: "op".to_string(),
            description: String::new(),
            parameters: json!({ "type": 12 }),
        };

        let report = verifier.verify(&make_call("op", json!({})), &declaration).unwrap();

        assert!(!report.passed);
        assert!(report.failures[0].message.contains("invalid JSON Schema"));
    }

    // ── Semantic phase ────────────────────────────────────────────────────────

    #[test]
    fn test_blank_query_fails_non_empty_rule() {
        let verifier = SchemaArgumentVerifier::with_non_empty_query();
        let call = make_call("op", json!({ "permintaan_pengguna": "   " }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, NON_EMPTY_QUERY_RULE);
    }

    #[test]
    fn test_blank_query_passes_without_default_rules() {
        let verifier = SchemaArgumentVerifier::new();
        let call = make_call("op", json!({ "permintaan_pengguna": "" }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(report.passed);
    }

    #[test]
    fn test_default_verifier_accepts_blank_query() {
        let verifier = SchemaArgumentVerifier::default();
        let call = make_call("op", json!({ "permintaan_pengguna": "" }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(report.passed, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_registered_rule_replaces_same_id() {
        let mut verifier = SchemaArgumentVerifier::new();
        verifier.register_rule("custom", Box::new(|_| Some("first".to_string())));
        verifier.register_rule("custom", Box::new(|_| Some("second".to_string())));
        let call = make_call("op", json!({ "permintaan_pengguna": "x" }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].message, "second");
    }

    #[test]
    fn test_mismatched_operation_name_fails() {
        let verifier = SchemaArgumentVerifier::new();
        let call = make_call("other", json!({ "permintaan_pengguna": "x" }));

        let report = verifier.verify(&call, &make_declaration("op")).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "operation-name");
    }

    #[test]
    fn test_every_catalog_declaration_accepts_a_query() {
        let verifier = SchemaArgumentVerifier::default();
        let catalog = ToolCatalog::hospital();

        for declaration in catalog.declarations() {
            let call = make_call(&declaration.name, json!({ "permintaan_pengguna": "Halo" }));
            let report = verifier.verify(&call, &declaration).unwrap();
            assert!(report.passed, "{}: {}", declaration.name, report.summary());
        }
    }

    // ── Compiled schema reuse ─────────────────────────────────────────────────

    #[test]
    fn test_schema_is_compiled_once_per_declaration() {
        let verifier = SchemaArgumentVerifier::new();
        let declaration = make_declaration("op");

        for query in ["a", "b", "c"] {
            let call = make_call("op", json!({ "permintaan_pengguna": query }));
            assert!(verifier.verify(&call, &declaration).unwrap().passed);
        }
        let other = make_call("other", json!({ "permintaan_pengguna": "x" }));
        verifier.verify(&other, &make_declaration("other")).unwrap();

        assert_eq!(verifier.compiled_count(), 2);
    }

    #[test]
    fn test_changed_schema_under_same_name_is_recompiled() {
        let verifier = SchemaArgumentVerifier::new();
        let call = make_call("op", json!({ "permintaan_pengguna": "x" }));
        assert!(verifier.verify(&call, &make_declaration("op")).unwrap().passed);

        let stricter = ToolDeclaration {
            name: "op".to_string(),
            description: String::new(),
            parameters: json!({
                "type": "object",
                "properties": { "permintaan_pengguna": { "type": "string", "minLength": 5 } },
                "required": ["permintaan_pengguna"]
            }),
        };
        let report = verifier.verify(&call, &stricter).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, JSON_SCHEMA_RULE);
        assert_eq!(verifier.compiled_count(), 1);
    }
}
