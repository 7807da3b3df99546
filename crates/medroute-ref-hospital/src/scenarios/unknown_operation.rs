//! Scenario E: unknown operation
//!
//! The decision names an operation outside the catalog. The executor rejects
//! it, the turn aborts, and no synthesis call is made.

use medroute_contracts::error::{MedrouteError, MedrouteResult};

use crate::scenarios::{print_run, run_turn, ScenarioRun};
use crate::scripted::KeywordRoutingGenerator;

pub const MESSAGE: &str = "Tolong proses permintaan khusus saya";
pub const OPERATION: &str = "panggil_sub_agen_tidak_dikenal";

pub fn run() -> MedrouteResult<ScenarioRun> {
    run_turn(KeywordRoutingGenerator::new().with_forced_operation(OPERATION), MESSAGE)
}

pub fn run_scenario() -> MedrouteResult<()> {
    println!("=== Scenario E: Unknown Operation ===");
    println!("  Message: {}", MESSAGE);
    println!("  Forced operation: {}", OPERATION);
    let run = run()?;
    print_run(&run);
    match run.outcome {
        Err(MedrouteError::UnknownOperation { .. }) => {
            println!("  RESULT: UnknownOperation (expected)");
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  Unexpectedly succeeded"),
    }
    println!();
    Ok(())
}
