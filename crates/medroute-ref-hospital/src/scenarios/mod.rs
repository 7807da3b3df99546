//! Hospital demo scenarios.
//!
//! Each scenario runs one coordinator turn over the mock records with the
//! scripted generator, records the delegation events in an audit trail and
//! prints what happened.

pub mod billing_default;
pub mod degraded_analysis;
pub mod direct_reply;
pub mod lab_results;
pub mod unknown_operation;

use std::cell::RefCell;
use std::sync::Arc;

use medroute_audit::{AuditLog, AuditObserver, InMemoryAuditTrail};
use medroute_contracts::{
    delegation::{DelegationResult, TurnOutcome},
    error::MedrouteResult,
    handler::{HandlerType, SessionId},
};
use medroute_core::traits::DelegationObserver;

use crate::{runtime::mock_coordinator, scripted::KeywordRoutingGenerator};

/// Everything a scenario turn produced.
#[derive(Debug)]
pub struct ScenarioRun {
    pub outcome: MedrouteResult<TurnOutcome>,
    /// `start <operation>` / `complete <handler>` in notification order.
    pub events: Vec<String>,
    pub generator_calls: usize,
    pub audit: AuditLog,
    pub audit_intact: bool,
}

/// Records notifications for display and forwards them to the audit trail.
struct ScenarioObserver {
    events: RefCell<Vec<String>>,
    audit: AuditObserver,
}

impl DelegationObserver for ScenarioObserver {
    fn on_delegation_start(&self, operation: &str) {
        self.events.borrow_mut().push(format!("start {operation}"));
        self.audit.on_delegation_start(operation);
    }

    fn on_delegation_complete(&self, result: &DelegationResult, handler: HandlerType) {
        self.events.borrow_mut().push(format!("complete {handler}"));
        self.audit.on_delegation_complete(result, handler);
    }
}

/// One turn with empty history.
pub(crate) fn run_turn(generator: KeywordRoutingGenerator, message: &str) -> MedrouteResult<ScenarioRun> {
    let generator = Arc::new(generator);
    let coordinator = mock_coordinator(generator.clone())?;

    let trail = InMemoryAuditTrail::new(SessionId::new());
    let observer = ScenarioObserver {
        events: RefCell::new(Vec::new()),
        audit: AuditObserver::new(trail.clone()),
    };

    let outcome = coordinator.submit_turn(&[], message, &observer);

    Ok(ScenarioRun {
        outcome,
        events: observer.events.into_inner(),
        generator_calls: generator.call_count(),
        audit: trail.export_log()?,
        audit_intact: trail.verify_integrity(),
    })
}

pub(crate) fn print_run(run: &ScenarioRun) {
    for event in &run.events {
        println!("  Observer:               {}", event);
    }
    match &run.outcome {
        Ok(outcome) => {
            println!("  Handler:                {}", outcome.handler_type);
            println!(
                "  Tool used:              {}",
                outcome.tool_used.as_deref().unwrap_or("-")
            );
            if let Some(delegation) = &outcome.delegation {
                println!("  Sub-agent analysis:     {}", delegation.analysis);
                println!("  Data snapshot:          {}", delegation.data_snapshot);
            }
            println!("  Final reply:            {}", outcome.final_text);
        }
        Err(e) => println!("  Turn aborted:           {}", e),
    }
    println!("  Model calls:            {}", run.generator_calls);
    println!(
        "  Audit chain integrity:  {} ({} event(s))",
        if run.audit_intact { "VERIFIED" } else { "FAILED" },
        run.audit.events.len()
    );
}
