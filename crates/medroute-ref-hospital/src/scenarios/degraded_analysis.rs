//! Scenario D: sub-agent analysis fails
//!
//! The handler's own model call errors. The delegation still succeeds with
//! the placeholder analysis and the untouched snapshot, and the coordinator
//! goes on to synthesize a reply.

use medroute_contracts::error::MedrouteResult;

use crate::scenarios::{print_run, run_turn, ScenarioRun};
use crate::scripted::KeywordRoutingGenerator;

pub const MESSAGE: &str = "Kapan jadwal kontrol saya? NIK 3273000000";

pub fn run() -> MedrouteResult<ScenarioRun> {
    run_turn(KeywordRoutingGenerator::new().with_failing_analysis(), MESSAGE)
}

pub fn run_scenario() -> MedrouteResult<()> {
    println!("=== Scenario D: Sub-Agent Analysis Fails ===");
    println!("  Message: {}", MESSAGE);
    let run = run()?;
    print_run(&run);
    run.outcome?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use medroute_contracts::{delegation::DelegationStatus, handler::HandlerType};
    use medroute_core::executor::DEGRADED_ANALYSIS_TEXT;

    use super::run;

    #[test]
    fn test_failed_analysis_degrades_to_placeholder() {
        let run = run().unwrap();
        let outcome = run.outcome.unwrap();

        assert_eq!(outcome.handler_type, HandlerType::Appointment);
        let delegation = outcome.delegation.unwrap();
        assert_eq!(delegation.status, DelegationStatus::Success);
        assert_eq!(delegation.analysis, DEGRADED_ANALYSIS_TEXT);

        let appointments = delegation.data_snapshot.as_array().unwrap();
        assert_eq!(appointments[0]["id"], "APT-001");

        assert_eq!(run.generator_calls, 3);
        assert!(outcome.final_text.contains(DEGRADED_ANALYSIS_TEXT));
    }
}
