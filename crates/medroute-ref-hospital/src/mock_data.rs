//! Simulated hospital records.
//!
//! All data in this module is hardcoded and fictional. It stands in for the
//! hospital information system a production deployment would query.

use serde_json::{json, Value};

/// Store key of the demo patient. The `x` run masks the rest of the NIK.
pub const DEMO_PATIENT_KEY: &str = "3273xxxxxxxxxx";

/// The full record table, keyed by subject id. Always contains `default`.
pub fn hospital_records() -> Value {
    json!({
        DEMO_PATIENT_KEY: {
            "biodata": {
                "name": "Budi Santoso",
                "dob": "1980-05-12",
                "address": "Jl. Merdeka No. 45, Bandung",
                "membership": "BPJS Kesehatan - Kelas 1"
            },
            "medical_history": {
                "last_visit": "2024-05-20",
                "diagnosis": "Bronkitis Akut dengan indikasi infeksi sekunder",
                "allergies": ["Penicillin", "Kacang"],
                "vitals_last_visit": { "bp": "130/85", "hr": "88", "temp": "38.2 C" },
                "lab_results": [
                    {
                        "test": "Leukosit",
                        "value": "13.500 /uL",
                        "status": "High (Normal: 4.000-10.000)",
                        "date": "2024-05-20"
                    },
                    {
                        "test": "Hemoglobin",
                        "value": "14.2 g/dL",
                        "status": "Normal",
                        "date": "2024-05-20"
                    },
                    {
                        "test": "C-Reactive Protein",
                        "value": "15 mg/L",
                        "status": "High (Indikasi Inflamasi)",
                        "date": "2024-05-20"
                    }
                ],
                "current_medication": [
                    "Azithromycin 500mg (1x1)",
                    "Paracetamol 500mg (3x1 bila demam)"
                ]
            },
            "appointments": [
                {
                    "id": "APT-001",
                    "doctor": "dr. Irawan Sp.P",
                    "date": "2024-05-27",
                    "time": "10:00",
                    "status": "Scheduled"
                }
            ],
            "billing": {
                "total_outstanding": 150000,
                "last_invoice": "INV-2024-005",
                "insurance_status": "Covered 80%"
            }
        },
        "default": {
            "name": "Pasien Umum",
            "status": "Data tidak ditemukan secara spesifik, menggunakan placeholder."
        }
    })
}
