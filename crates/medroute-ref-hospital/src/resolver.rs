//! Subject resolution from free-text queries.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use medroute_contracts::record::SubjectKey;
use medroute_core::traits::SubjectResolver;

/// A national id (NIK) candidate: ten or more consecutive digits.
static NIK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{10,}").expect("valid regex"));

/// Token accepted when the query names a region code but no full NIK.
pub const DEFAULT_FALLBACK_TOKEN: &str = "3273";

/// Resolves the first run of 10+ digits, else the first fallback token found
/// anywhere in the query, else `SubjectKey::Default`.
#[derive(Debug, Clone)]
pub struct NikResolver {
    fallback_tokens: Vec<String>,
}

impl NikResolver {
    pub fn new(fallback_tokens: Vec<String>) -> Self {
        Self { fallback_tokens }
    }
}

impl Default for NikResolver {
    fn default() -> Self {
        Self::new(vec![DEFAULT_FALLBACK_TOKEN.to_string()])
    }
}

impl SubjectResolver for NikResolver {
    fn resolve(&self, query: &str) -> SubjectKey {
        let key = if let Some(nik) = NIK_PATTERN.find(query) {
            SubjectKey::Id(nik.as_str().to_string())
        } else if let Some(token) = self.fallback_tokens.iter().find(|t| query.contains(t.as_str())) {
            SubjectKey::Id(token.clone())
        } else {
            SubjectKey::Default
        };
        debug!(subject = ?key, "subject resolved from query");
        key
    }
}
