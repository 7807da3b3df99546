//! Interactive chat session against the hospital runtime.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use medroute_audit::{AuditObserver, InMemoryAuditTrail};
use medroute_contracts::error::{MedrouteError, MedrouteResult};
use medroute_core::{
    session::{Sender, TranscriptEntry, CONNECTIVITY_ERROR_TEXT},
    traits::TextGenerator,
    Session,
};
use medroute_gemini::GeminiClient;
use medroute_policy::TomlScopePolicy;
use medroute_ref_hospital::{runtime::build_coordinator, scripted::KeywordRoutingGenerator};

use crate::config::AppConfig;

pub struct ChatOptions<'a> {
    pub config: AppConfig,
    pub policy_path: Option<&'a Path>,
    /// Serve every model call from the keyword-routing generator.
    pub offline: bool,
}

pub fn run_chat(options: ChatOptions<'_>) -> MedrouteResult<()> {
    let generator: Arc<dyn TextGenerator> = if options.offline {
        Arc::new(KeywordRoutingGenerator::new())
    } else {
        Arc::new(GeminiClient::new(options.config.gemini.clone())?)
    };
    let policy = match options.policy_path {
        Some(path) => TomlScopePolicy::from_file(path)?,
        None => TomlScopePolicy::hospital()?,
    };
    let store = options.config.store.build_store()?;

    let mut session = Session::new(build_coordinator(generator, store, policy));
    let trail = InMemoryAuditTrail::new(session.id());
    let observer = AuditObserver::new(trail.clone());

    info!(session_id = %session.id(), offline = options.offline, "chat session started");
    println!("Koordinator Pusat siap. Ketik pesan, atau /keluar untuk selesai.");
    println!();

    let stdin = io::stdin();
    let mut printed = 0;
    loop {
        print!("> ");
        io::stdout().flush().map_err(io_error)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(io_error)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/keluar" || message == "/quit" {
            break;
        }

        match session.send(message, &observer) {
            Ok(_) => {
                // The user's own line is already on screen.
                for entry in session.transcript().iter().skip(printed + 1) {
                    print_entry(entry);
                }
                printed = session.transcript().len();
            }
            Err(e) => {
                error!(session_id = %session.id(), error = %e, "turn failed");
                println!("[SISTEM] {}", CONNECTIVITY_ERROR_TEXT);
            }
        }
        println!();
    }

    let log = trail.export_log()?;
    println!(
        "Sesi selesai: {} entri transkrip, {} event audit, rantai {}.",
        session.transcript().len(),
        log.events.len(),
        if trail.verify_integrity() { "VERIFIED" } else { "FAILED" }
    );
    Ok(())
}

fn print_entry(entry: &TranscriptEntry) {
    let label = match entry.sender {
        Sender::User => "ANDA",
        Sender::Coordinator => "KOORDINATOR",
        Sender::System => "SISTEM",
        Sender::Agent => entry.metadata.agent_name.as_deref().unwrap_or("SUB-AGEN"),
    };
    println!("[{}] {}", label, entry.text);
    if let (Some(handler), Some(ms)) = (entry.metadata.handler_type, entry.metadata.processing_time_ms) {
        println!("      ({} · {} ms)", handler, ms);
    }
}

fn io_error(e: io::Error) -> MedrouteError {
    MedrouteError::ConfigError {
        reason: format!("terminal I/O failed: {}", e),
    }
}
