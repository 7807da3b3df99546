//! Scenario C: direct reply
//!
//! A greeting matches no handler. The coordinator answers itself, the turn is
//! tagged COORDINATOR, the executor never runs and the observer hears
//! nothing.

use medroute_contracts::error::MedrouteResult;

use crate::scenarios::{print_run, run_turn, ScenarioRun};
use crate::scripted::KeywordRoutingGenerator;

pub const MESSAGE: &str = "Halo, apa kabar?";

pub fn run() -> MedrouteResult<ScenarioRun> {
    run_turn(KeywordRoutingGenerator::new(), MESSAGE)
}

pub fn run_scenario() -> MedrouteResult<()> {
    println!("=== Scenario C: Direct Reply ===");
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
    use crate::scripted::DIRECT_GREETING;

    #[test]
    fn test_no_delegation_no_callbacks() {
        let run = run().unwrap();
        let outcome = run.outcome.unwrap();

        assert_eq!(outcome.handler_type, HandlerType::Coordinator);
        assert!(!outcome.is_delegated());
        assert!(outcome.tool_used.is_none());
        assert!(outcome.delegation.is_none());
        assert_eq!(outcome.final_text, DIRECT_GREETING);
        assert!(run.events.is_empty());
        assert_eq!(run.generator_calls, 1);
        assert!(run.audit.events.is_empty());
    }
}
