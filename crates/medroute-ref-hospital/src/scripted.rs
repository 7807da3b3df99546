//! A deterministic `TextGenerator` for running the hospital demo offline.
//!
//! It plays all three model roles from the shape of the request:
//!
//! - tools offered → coordinator decision: route on keywords in the last user
//!   turn and forward that turn verbatim, or answer directly
//! - last turn is a function result → synthesis: relay the sub-agent analysis
//! - otherwise → sub-agent analysis: list the fields of the data it was given

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use medroute_contracts::{
    conversation::{GenerateRequest, GenerateResponse, Part, Role},
    error::{MedrouteError, MedrouteResult},
};
use medroute_core::{catalog::QUERY_ARGUMENT, traits::TextGenerator};

/// Keyword → operation table, checked in order. Clinical terms come first so
/// a mixed request goes to medical records.
const ROUTES: &[(&[&str], &str)] = &[
    (
        &["lab", "diagnos", "obat", "alergi", "rekam medis", "klinis"],
        "panggil_sub_agen_rekam_medis",
    ),
    (
        &["tagihan", "biaya", "bayar", "asuransi", "invoice"],
        "panggil_sub_agen_penagihan",
    ),
    (
        &["jadwal", "janji", "booking", "reschedule", "dokter"],
        "panggil_sub_agen_penjadwal",
    ),
    (
        &["alamat", "biodata", "pendaftaran", "data diri", "bpjs"],
        "panggil_sub_agen_manajemen_pasien",
    ),
];

/// Reply given when no route matches.
pub const DIRECT_GREETING: &str =
    "Halo, saya Koordinator Pusat. Silakan sampaikan kebutuhan medis, jadwal, administrasi, atau tagihan Anda.";

const DATA_MARKER: &str = "DATA MENTAH DARI DATABASE SISTEM:\n";
const QUERY_MARKER: &str = "\n\nPERMINTAAN SPESIFIK PENGGUNA:";

#[derive(Debug, Default)]
pub struct KeywordRoutingGenerator {
    fail_analysis: bool,
    forced_operation: Option<String>,
    calls: AtomicUsize,
}

impl KeywordRoutingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sub-agent analysis call fails.
    pub fn with_failing_analysis(mut self) -> Self {
        self.fail_analysis = true;
        self
    }

    /// Every decision calls `operation`, whatever the message says.
    pub fn with_forced_operation(mut self, operation: impl Into<String>) -> Self {
        self.forced_operation = Some(operation.into());
        self
    }

    /// Number of `generate` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn decide(&self, request: &GenerateRequest) -> GenerateResponse {
        let message = last_text(request, Role::User).unwrap_or_default();
        let lowered = message.to_lowercase();

        let operation = self.forced_operation.clone().or_else(|| {
            ROUTES
                .iter()
                .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
                .map(|(_, operation)| operation.to_string())
        });

        match operation {
            Some(operation) => {
                GenerateResponse::from_call(operation, json!({ QUERY_ARGUMENT: message }))
            }
            None => GenerateResponse::from_text(DIRECT_GREETING),
        }
    }

    fn analyze(&self, request: &GenerateRequest) -> MedrouteResult<GenerateResponse> {
        if self.fail_analysis {
            return Err(MedrouteError::CapabilityUnavailable {
                reason: "scripted sub-agent failure".to_string(),
            });
        }

        let prompt = last_text(request, Role::User).unwrap_or_default();
        let data = prompt
            .split_once(DATA_MARKER)
            .and_then(|(_, rest)| rest.split_once(QUERY_MARKER))
            .and_then(|(data, _)| serde_json::from_str::<Value>(data).ok());

        let summary = match data {
            Some(Value::Object(fields)) => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                format!("Data diterima dengan field: {}.", names.join(", "))
            }
            Some(Value::Array(items)) => format!("Ditemukan {} entri.", items.len()),
            _ => "Tidak ada data terstruktur.".to_string(),
        };
        Ok(GenerateResponse::from_text(summary))
    }

    fn synthesize(&self, request: &GenerateRequest) -> GenerateResponse {
        let analysis = request
            .contents
            .last()
            .and_then(|turn| {
                turn.parts.iter().find_map(|part| match part {
                    Part::FunctionResponse { response, .. } => {
                        response["result"]["agent_analysis"].as_str().map(str::to_string)
                    }
                    _ => None,
                })
            })
            .unwrap_or_default();
        GenerateResponse::from_text(format!("Hasil dari sub-agen: {}", analysis))
    }
}

impl TextGenerator for KeywordRoutingGenerator {
    fn generate(&self, request: &GenerateRequest) -> MedrouteResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !request.tools.is_empty() {
            return Ok(self.decide(request));
        }
        match request.contents.last().map(|turn| turn.role) {
            Some(Role::Function) => Ok(self.synthesize(request)),
            _ => self.analyze(request),
        }
    }
}

fn last_text(request: &GenerateRequest, role: Role) -> Option<String> {
    request
        .contents
        .iter()
        .rev()
        .find(|turn| turn.role == role)
        .and_then(|turn| turn.text())
}
