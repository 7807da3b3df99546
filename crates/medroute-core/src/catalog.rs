//! The static tool catalog and the directives that go with it.
//!
//! Each delegable handler has exactly one entry: a tool declaration the
//! decision capability chooses from, a persona directive for the handler's own
//! model call, and display metadata for the surrounding application. The
//! declaration description is the only signal the decision capability gets, so
//! it names both the handler's domain and what it must not be used for.

use std::collections::HashSet;

use serde_json::{json, Value};

use medroute_contracts::{
    conversation::ToolDeclaration,
    error::{MedrouteError, MedrouteResult},
    handler::HandlerType,
};

/// The single required argument of every catalog operation: the user's query,
/// forwarded verbatim.
pub const QUERY_ARGUMENT: &str = "permintaan_pengguna";

/// Routing runs at minimal randomness so the same conversation always picks
/// the same operation.
pub const COORDINATOR_TEMPERATURE: f32 = 0.0;

/// Sub-agent narration may vary, but stays grounded in the snapshot.
pub const SUB_AGENT_TEMPERATURE: f32 = 0.4;

/// Coordinator policy: never answer directly, one call per turn, forward the
/// full query, route clinical questions to medical records.
pub const COORDINATOR_DIRECTIVE: &str = r#"
# PERAN KOORDINATOR PUSAT (SISTEM RUMAH SAKIT)

Anda adalah 'Sistem Rumah Sakit,' Koordinator Pusat untuk seluruh layanan berbasis Agen AI. Misi Anda adalah menyediakan layanan kesehatan yang efisien dan aman dengan mendelegasikan tugas secara sempurna.

[8] DAFTAR SUB-AGEN YANG TERSEDIA:
- Sub-agen Manajemen Pasien (Untuk pendaftaran, identitas, atau info umum pasien yang tidak sensitif).
- Sub-agen Penjadwal Janji Temu (Untuk booking atau modifikasi jadwal).
- Sub-agen Rekam Medis (Untuk data klinis, riwayat, hasil lab, diagnosis).
- Sub-agen Penagihan dan Asuransi (Untuk kueri biaya, klaim, atau penagihan).

[9] PRINSIP OPERASIONAL KETAT (HARUS DIIKUTI):
A. DELEGASI WAJIB: Anda tidak pernah boleh mencoba memproses atau menjawab permintaan pengguna secara langsung. Tugas Anda adalah MENGANALISIS maksud pengguna dan HANYA mendelegasikannya.
B. PRINSIP SATU PANGGILAN: Anda harus memanggil HANYA SATU sub-agen yang paling sesuai per permintaan pengguna.
C. TRANSMISI DATA: Anda harus menyertakan semua detail yang relevan dari kueri asli pengguna dalam pemanggilan (arguments) ke sub-agen yang dipilih.

[10] PRIORITAS TINGGI (KHUSUS REKAM MEDIS):
Jika permintaan melibatkan riwayat medis, hasil lab, atau diagnosis, Anda harus memilih 'Sub-agen Rekam Medis'. Ingat, sub-agen tersebut diinstruksikan untuk memproses data tersebut dengan prioritas keamanan dan privasi data tertinggi, sesuai dengan kewajiban regulasi Rekam Medis Elektronik.
"#;

const MEDICAL_RECORDS_DIRECTIVE: &str = r#"
Anda adalah SPESIALIS REKAM MEDIS & ANALISIS KLINIS.
Tugas: Menganalisis data mentah pasien dan menjawab pertanyaan klinis pengguna dengan bahasa medis yang profesional namun mudah dipahami.
Konteks: Anda berbicara kepada Koordinator Pusat, yang akan meneruskan pesan Anda ke pengguna.
Peringatan: Jika hasil lab tidak normal, jelaskan implikasinya dengan hati-hati. Jaga privasi.
"#;

const PATIENT_MANAGEMENT_DIRECTIVE: &str = r#"
Anda adalah STAFF ADMINISTRASI RUMAH SAKIT.
Tugas: Memverifikasi data identitas dan status pendaftaran pasien.
Gaya Bicara: Ramah, efisien, dan administratif.
"#;

const APPOINTMENT_DIRECTIVE: &str = r#"
Anda adalah KOORDINATOR JADWAL DOKTER.
Tugas: Mengatur waktu, mengecek ketersediaan slot, dan memberikan opsi waktu terbaik.
Gaya Bicara: Ringkas dan berorientasi pada solusi waktu.
"#;

const BILLING_DIRECTIVE: &str = r#"
Anda adalah AKUNTAN RUMAH SAKIT & SPESIALIS ASURANSI.
Tugas: Menjelaskan rincian biaya, status klaim BPJS/Asuransi, dan status pembayaran.
Gaya Bicara: Formal, akurat, dan transparan mengenai angka.
"#;

/// One delegable handler as the runtime knows it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub handler: HandlerType,
    /// What the decision capability sees.
    pub declaration: ToolDeclaration,
    /// System directive for the handler's own analysis call.
    pub directive: String,
    /// Human-facing name, e.g. "Sub-agen Rekam Medis".
    pub display_name: String,
    /// One-line summary for status displays.
    pub summary: String,
}

/// The ordered, validated set of catalog entries plus the coordinator policy.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    coordinator_directive: String,
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting anything that would make routing ambiguous.
    ///
    /// # Errors
    ///
    /// `ConfigError` when an operation name or handler appears twice, when an
    /// entry targets `Coordinator`, or when a declaration does not take exactly
    /// one required string argument.
    pub fn new(
        coordinator_directive: impl Into<String>,
        entries: Vec<CatalogEntry>,
    ) -> MedrouteResult<Self> {
        let mut names = HashSet::new();
        let mut handlers = HashSet::new();

        for entry in &entries {
            if !entry.handler.is_delegable() {
                return Err(MedrouteError::ConfigError {
                    reason: format!(
                        "catalog entry '{}' targets {}, which is never a delegation target",
                        entry.declaration.name, entry.handler
                    ),
                });
            }
            if !names.insert(entry.declaration.name.clone()) {
                return Err(MedrouteError::ConfigError {
                    reason: format!("duplicate operation name '{}'", entry.declaration.name),
                });
            }
            if !handlers.insert(entry.handler) {
                return Err(MedrouteError::ConfigError {
                    reason: format!("handler {} has more than one catalog entry", entry.handler),
                });
            }
            check_single_string_argument(&entry.declaration)?;
        }

        Ok(Self {
            coordinator_directive: coordinator_directive.into(),
            entries,
        })
    }

    /// The hospital catalog: medical records, patient management, appointment
    /// scheduling, and billing, in that order.
    pub fn hospital() -> Self {
        let entries = vec![
            entry(
                HandlerType::MedicalRecords,
                "panggil_sub_agen_rekam_medis",
                "Mengambil dan merangkum riwayat medis pasien, hasil lab, diagnosis, dan rencana perawatan. PERHATIAN: Hanya untuk data klinis dan harus menjamin privasi dan keamanan data.",
                query_parameters(
                    "Kueri lengkap pengguna yang akan diteruskan. Contoh: 'Tolong berikan ringkasan diagnosis CT Thorax Tuan Budi bulan lalu.'",
                ),
                MEDICAL_RECORDS_DIRECTIVE,
                "Sub-agen Rekam Medis",
                "Akses data klinis sensitif, diagnosis, lab.",
            ),
            entry(
                HandlerType::PatientManagement,
                "panggil_sub_agen_manajemen_pasien",
                "Menangani pendaftaran pasien baru, pembaruan data identitas, atau pertanyaan umum non-medis.",
                query_parameters("Kueri lengkap pengguna."),
                PATIENT_MANAGEMENT_DIRECTIVE,
                "Sub-agen Manajemen Pasien",
                "Info umum, pendaftaran, administrasi dasar.",
            ),
            entry(
                HandlerType::Appointment,
                "panggil_sub_agen_penjadwal",
                "Menangani pembuatan janji temu, perubahan jadwal, atau pembatalan dengan dokter.",
                query_parameters("Kueri lengkap pengguna."),
                APPOINTMENT_DIRECTIVE,
                "Sub-agen Penjadwal",
                "Booking, reschedule, cek jadwal dokter.",
            ),
            entry(
                HandlerType::Billing,
                "panggil_sub_agen_penagihan",
                "Menangani pertanyaan seputar tagihan rumah sakit, asuransi, dan metode pembayaran.",
                query_parameters("Kueri lengkap pengguna."),
                BILLING_DIRECTIVE,
                "Sub-agen Penagihan",
                "Informasi biaya, asuransi, dan pembayaran.",
            ),
        ];

        Self {
            coordinator_directive: COORDINATOR_DIRECTIVE.to_string(),
            entries,
        }
    }

    pub fn coordinator_directive(&self) -> &str {
        &self.coordinator_directive
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The declarations offered to the decision capability, in catalog order.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.entries.iter().map(|e| e.declaration.clone()).collect()
    }

    pub fn entry_for_operation(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.declaration.name == name)
    }

    pub fn entry_for_handler(&self, handler: HandlerType) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.handler == handler)
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::hospital()
    }
}

/// JSON Schema for an object with one required string property, the query.
pub fn query_parameters(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            QUERY_ARGUMENT: {
                "type": "string",
                "description": description
            }
        },
        "required": [QUERY_ARGUMENT]
    })
}

fn entry(
    handler: HandlerType,
    name: &str,
    description: &str,
    parameters: Value,
    directive: &str,
    display_name: &str,
    summary: &str,
) -> CatalogEntry {
    CatalogEntry {
        handler,
        declaration: ToolDeclaration {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        },
        directive: directive.to_string(),
        display_name: display_name.to_string(),
        summary: summary.to_string(),
    }
}

fn check_single_string_argument(declaration: &ToolDeclaration) -> MedrouteResult<()> {
    let invalid = |why: &str| MedrouteError::ConfigError {
        reason: format!("declaration '{}' {}", declaration.name, why),
    };

    let required = declaration.parameters["required"]
        .as_array()
        .ok_or_else(|| invalid("has no required argument list"))?;
    if required.len() != 1 {
        return Err(invalid("must have exactly one required argument"));
    }
    let name = required[0]
        .as_str()
        .ok_or_else(|| invalid("names its required argument with a non-string"))?;
    if name != QUERY_ARGUMENT {
        return Err(invalid(&format!(
            "must name its required argument '{QUERY_ARGUMENT}', not '{name}'"
        )));
    }
    let kind = declaration.parameters["properties"][name]["type"].as_str();
    if kind != Some("string") {
        return Err(invalid("must take its required argument as a string"));
    }
    Ok(())
}
