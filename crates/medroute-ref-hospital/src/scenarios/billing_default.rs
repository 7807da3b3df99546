//! Scenario B: billing without an identifier
//!
//! No NIK in the message, so the subject falls back to the sentinel record.
//! That record has no billing section; the snapshot is the whole sentinel
//! record with a "billing data unavailable" message.

use medroute_contracts::error::MedrouteResult;

use crate::scenarios::{print_run, run_turn, ScenarioRun};
use crate::scripted::KeywordRoutingGenerator;

pub const MESSAGE: &str = "Berapa tagihan saya bulan ini?";

pub fn run() -> MedrouteResult<ScenarioRun> {
    run_turn(KeywordRoutingGenerator::new(), MESSAGE)
}

pub fn run_scenario() -> MedrouteResult<()> {
    println!("=== Scenario B: Billing Without an Identifier ===");
    println!("  Message: {}", MESSAGE);
    let run = run()?;
    print_run(&run);
    run.outcome?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use medroute_contracts::handler::HandlerType;

    use super::run;

    #[test]
    fn test_billing_falls_back_to_default_record() {
        let outcome = run().unwrap().outcome.unwrap();

        assert_eq!(outcome.handler_type, HandlerType::Billing);
        let snapshot = outcome.delegation.unwrap().data_snapshot;
        assert_eq!(snapshot["name"], "Pasien Umum");
        assert_eq!(snapshot["message"], "Billing data unavailable");
        assert!(snapshot.get("total_outstanding").is_none());
    }
}
