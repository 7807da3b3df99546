//! MEDROUTE Hospital Delegation Demo CLI
//!
//! Runs the scripted delegation scenarios, lists the sub-agent roster, or
//! opens an interactive chat with the coordinator.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- lab-results
//!   cargo run -p demo -- agents
//!   cargo run -p demo -- chat --offline
//!   GEMINI_API_KEY=... cargo run -p demo -- chat

mod chat;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medroute_contracts::error::MedrouteResult;
use medroute_core::ToolCatalog;
use medroute_ref_hospital::scenarios::{
    billing_default, degraded_analysis, direct_reply, lab_results, unknown_operation,
};

use crate::{
    chat::{run_chat, ChatOptions},
    config::AppConfig,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// MEDROUTE: coordinator/sub-agent delegation for a hospital assistant.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MEDROUTE hospital delegation demo",
    long_about = "Runs MEDROUTE scenarios showing single delegation, data scoping,\n\
                  default-subject fallback, degraded analysis and unknown operations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario A: lab results by NIK (clinical scoping).
    LabResults,
    /// Scenario B: billing without an identifier (default record).
    BillingDefault,
    /// Scenario C: direct coordinator reply (no delegation).
    DirectReply,
    /// Scenario D: sub-agent analysis fails (placeholder analysis).
    DegradedAnalysis,
    /// Scenario E: unknown operation (turn aborts).
    UnknownOperation,
    /// List the sub-agents in the tool catalog.
    Agents,
    /// Interactive session with the coordinator.
    Chat {
        /// Config file; defaults to ./medroute.toml when present.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Scoping policy TOML replacing the built-in one.
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Use the keyword-routing generator instead of Gemini.
        #[arg(long)]
        offline: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug for per-phase turn logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::LabResults => lab_results::run_scenario(),
        Command::BillingDefault => billing_default::run_scenario(),
        Command::DirectReply => direct_reply::run_scenario(),
        Command::DegradedAnalysis => degraded_analysis::run_scenario(),
        Command::UnknownOperation => unknown_operation::run_scenario(),
        Command::Agents => {
            print_agents();
            Ok(())
        }
        Command::Chat {
            config,
            policy,
            offline,
        } => AppConfig::load(config.as_deref()).and_then(|config| {
            run_chat(ChatOptions {
                config,
                policy_path: policy.as_deref(),
                offline,
            })
        }),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn run_all() -> MedrouteResult<()> {
    lab_results::run_scenario()?;
    billing_default::run_scenario()?;
    direct_reply::run_scenario()?;
    degraded_analysis::run_scenario()?;
    unknown_operation::run_scenario()?;
    println!("All scenarios completed.");
    Ok(())
}

fn print_agents() {
    let catalog = ToolCatalog::hospital();
    for entry in catalog.entries() {
        println!("  {:<28} {}", entry.display_name, entry.handler);
        println!("    operation: {}", entry.declaration.name);
        println!("    {}", entry.summary);
        println!();
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("MEDROUTE: Hospital Coordinator / Sub-Agent Delegation");
    println!("=====================================================");
    println!();
    println!("Per turn:");
    println!("  [1] Coordinator model decides: one structured call, or a direct reply");
    println!("  [2] Arguments checked against the operation's JSON Schema");
    println!("  [3] Subject resolved from the query (NIK, else default record)");
    println!("  [4] Record scoped to the handler's section, then analyzed by the sub-agent");
    println!("  [5] Coordinator synthesizes the reply from the delegation result");
    println!();
}
