//! Scenario A: lab results by NIK
//!
//! The message carries a 10-digit NIK. The coordinator routes to medical
//! records, the NIK resolves to the demo patient, and the handler sees the
//! clinical section plus the patient's name. Address and billing stay out of
//! the snapshot.

use medroute_contracts::error::MedrouteResult;

use crate::scenarios::{print_run, run_turn, ScenarioRun};
use crate::scripted::KeywordRoutingGenerator;

pub const MESSAGE: &str = "Tolong cek hasil lab atas nama pasien dengan NIK 3273000000";

pub fn run() -> MedrouteResult<ScenarioRun> {
    run_turn(KeywordRoutingGenerator::new(), MESSAGE)
}

pub fn run_scenario() -> MedrouteResult<()> {
    println!("=== Scenario A: Lab Results by NIK ===");
    println!("  Message: {}", MESSAGE);
    let run = run()?;
    print_run(&run);
    run.outcome?;
    println!();
    Ok(())
}
