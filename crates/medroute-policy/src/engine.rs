//! TOML-driven scope policy implementation.
//!
//! `TomlScopePolicy` loads a `ScopeConfig` from a TOML string or file and
//! implements the `ScopePolicy` trait from medroute-core.
//!
//! Scoping algorithm for one (handler, record) pair:
//!
//! 1. Find the handler's rule (exactly one exists in a loaded policy).
//! 2. If the record carries the rule's section:
//!    a. an empty list becomes `{message}` when the rule has an
//!       `absent_message`;
//!    b. otherwise the section is returned, with the display name merged in
//!       front when `merge_display_name` is set.
//! 3. If the section is absent, the whole record is returned, plus `message`
//!    when the rule has an `absent_message`.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use medroute_contracts::{
    error::{MedrouteError, MedrouteResult},
    handler::HandlerType,
    record::SubjectRecord,
};
use medroute_core::traits::ScopePolicy;

use crate::rule::{ScopeConfig, ScopeRule};

/// The scoping policy shipped with the runtime.
pub const HOSPITAL_SCOPING_POLICY: &str = include_str!("../policies/scoping.toml");

/// A `ScopePolicy` implementation that reads its rules from a TOML document.
///
/// ```rust,ignore
/// use medroute_policy::engine::TomlScopePolicy;
///
/// let policy = TomlScopePolicy::from_file(Path::new("policies/scoping.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlScopePolicy {
    rules: HashMap<HandlerType, ScopeRule>,
}

impl TomlScopePolicy {
    /// Parse `s` as TOML and build a validated policy.
    ///
    /// Returns `MedrouteError::ConfigError` if the TOML is malformed, if a rule
    /// targets the coordinator, or if any delegable handler has zero or more
    /// than one rule.
    pub fn from_toml_str(s: &str) -> MedrouteResult<Self> {
        let config: ScopeConfig = toml::from_str(s).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to parse scoping policy TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a TOML scoping policy.
    pub fn from_file(path: &Path) -> MedrouteResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedrouteError::ConfigError {
            reason: format!("failed to read scoping policy '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The built-in hospital scoping policy.
    pub fn hospital() -> MedrouteResult<Self> {
        Self::from_toml_str(HOSPITAL_SCOPING_POLICY)
    }

    fn from_config(config: ScopeConfig) -> MedrouteResult<Self> {
        let mut rules: HashMap<HandlerType, ScopeRule> = HashMap::new();

        for rule in config.scopes {
            let handler = HandlerType::from(rule.handler);
            if !handler.is_delegable() {
                return Err(MedrouteError::ConfigError {
                    reason: format!("scope rule '{}' targets {}, which reads no data", rule.id, handler),
                });
            }
            if let Some(existing) = rules.get(&handler) {
                return Err(MedrouteError::ConfigError {
                    reason: format!(
                        "handler {} is scoped twice (rules '{}' and '{}')",
                        handler, existing.id, rule.id
                    ),
                });
            }
            rules.insert(handler, rule);
        }

        for handler in HandlerType::DELEGABLE {
            if !rules.contains_key(&handler) {
                return Err(MedrouteError::ConfigError {
                    reason: format!("no scope rule for handler {}", handler),
                });
            }
        }

        Ok(Self { rules })
    }

    /// The rule applied to `handler`, if any.
    pub fn rule(&self, handler: HandlerType) -> Option<&ScopeRule> {
        self.rules.get(&handler)
    }
}

impl ScopePolicy for TomlScopePolicy {
    fn scope(&self, handler: HandlerType, record: &SubjectRecord) -> MedrouteResult<Value> {
        let rule = self.rules.get(&handler).ok_or_else(|| MedrouteError::ConfigError {
            reason: format!("no scope rule for handler {}", handler),
        })?;

        let snapshot = match record.section(rule.section) {
            Some(Value::Array(items)) if items.is_empty() => match &rule.absent_message {
                Some(message) => json!({ "message": message }),
                None => Value::Array(Vec::new()),
            },

            Some(section) => {
                debug!(rule_id = %rule.id, handler = %handler, section = ?rule.section, "section scoped");
                match (rule.merge_display_name, section) {
                    (true, Value::Object(fields)) => {
                        let mut merged = Map::new();
                        if let Some(name) = record.display_name() {
                            merged.insert("name".to_string(), Value::String(name.to_string()));
                        }
                        for (key, value) in fields {
                            merged.insert(key.clone(), value.clone());
                        }
                        Value::Object(merged)
                    }
                    _ => section.clone(),
                }
            }

            // Absent section: hand over the whole record so the payload is never
            // empty. Only the sentinel record is expected to take this path.
            None => {
                warn!(
                    rule_id = %rule.id,
                    handler = %handler,
                    section = ?rule.section,
                    "section absent on record, falling back to whole record"
                );
                let mut whole = record.to_value();
                if let (Some(message), Value::Object(fields)) = (&rule.absent_message, &mut whole) {
                    fields.insert("message".to_string(), Value::String(message.clone()));
                }
                whole
            }
        };

        Ok(snapshot)
    }
}
