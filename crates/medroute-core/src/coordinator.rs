//! The coordinator: one user turn from message to final reply.
//!
//! Per-turn state machine:
//!
//!   THINKING ─┬─ call ──► DELEGATING ► AWAITING_HANDLER ► SYNTHESIZING ─┬─► DONE
//!             └─ text ──► DIRECT ──────────────────────────────────────┘
//!
//! Each stage's input includes the previous stage's full output; nothing runs
//! concurrently and there is at most one delegation per turn.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use medroute_contracts::{
    conversation::{ConversationTurn, GenerateRequest},
    delegation::TurnOutcome,
    error::MedrouteResult,
    handler::{HandlerType, TurnId},
};

use crate::{
    catalog::{ToolCatalog, COORDINATOR_TEMPERATURE},
    executor::SubAgentExecutor,
    traits::{DelegationObserver, TextGenerator},
};

/// Reply used when synthesis returned no text.
pub const SYNTHESIS_FALLBACK_TEXT: &str = "Delegasi selesai.";

/// Reply used when the coordinator neither delegated nor produced text.
pub const DIRECT_FALLBACK_TEXT: &str =
    "Maaf, saya tidak dapat memproses permintaan tanpa pendelegasian yang valid.";

/// The stages a turn moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Thinking,
    Delegating,
    AwaitingHandler,
    Synthesizing,
    Direct,
    Done,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TurnPhase::Thinking => "thinking",
            TurnPhase::Delegating => "delegating",
            TurnPhase::AwaitingHandler => "awaiting-handler",
            TurnPhase::Synthesizing => "synthesizing",
            TurnPhase::Direct => "direct",
            TurnPhase::Done => "done",
        };
        f.write_str(label)
    }
}

/// Orchestrates coordinator turns over a shared catalog and executor.
///
/// Holds no conversation state: callers pass the history snapshot for every
/// turn, so concurrent turns on different sessions cannot interfere.
pub struct Coordinator {
    catalog: Arc<ToolCatalog>,
    generator: Arc<dyn TextGenerator>,
    executor: SubAgentExecutor,
}

impl Coordinator {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        generator: Arc<dyn TextGenerator>,
        executor: SubAgentExecutor,
    ) -> Self {
        Self {
            catalog,
            generator,
            executor,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Run one turn.
    ///
    /// # Pipeline
    ///
    /// 1. THINKING: history + message, coordinator directive, full catalog,
    ///    temperature 0
    /// 2. A structured call → notify `on_delegation_start`, run the executor
    ///    synchronously, notify `on_delegation_complete`
    /// 3. SYNTHESIZING: history + message + the model's call turn + one
    ///    function-result turn; its text is the reply
    /// 4. No call → the text is the reply, tagged `HandlerType::Coordinator`
    ///
    /// # Errors
    ///
    /// Any failure of either coordinator model call, and `UnknownOperation` /
    /// `InvalidArguments` from the executor. No reply is produced and no
    /// synthesis call is made after an executor error.
    pub fn submit_turn(
        &self,
        history: &[ConversationTurn],
        message: &str,
        observer: &dyn DelegationObserver,
    ) -> MedrouteResult<TurnOutcome> {
        let turn_id = TurnId::new();
        let mut contents: Vec<ConversationTurn> = history.to_vec();
        contents.push(ConversationTurn::user(message));

        // ── THINKING ─────────────────────────────────────────────────────────
        debug!(turn_id = %turn_id, phase = %TurnPhase::Thinking, history_len = history.len(), "turn starting");
        let decision = self.generator.generate(&GenerateRequest {
            system_directive: self.catalog.coordinator_directive().to_string(),
            tools: self.catalog.declarations(),
            temperature: Some(COORDINATOR_TEMPERATURE),
            contents: contents.clone(),
        })?;

        let call = match decision.first_call() {
            Some(call) => call.clone(),
            None => {
                // ── DIRECT ───────────────────────────────────────────────────
                warn!(turn_id = %turn_id, phase = %TurnPhase::Direct, "coordinator answered without delegating");
                let final_text = decision
                    .text()
                    .unwrap_or_else(|| DIRECT_FALLBACK_TEXT.to_string());
                debug!(turn_id = %turn_id, phase = %TurnPhase::Done, "turn finished");
                return Ok(TurnOutcome {
                    turn_id,
                    final_text,
                    tool_used: None,
                    handler_type: HandlerType::Coordinator,
                    delegation: None,
                });
            }
        };

        // ── DELEGATING ───────────────────────────────────────────────────────
        info!(turn_id = %turn_id, phase = %TurnPhase::Delegating, operation = %call.name, "delegating to sub-agent");
        observer.on_delegation_start(&call.name);

        // ── AWAITING_HANDLER ─────────────────────────────────────────────────
        debug!(turn_id = %turn_id, phase = %TurnPhase::AwaitingHandler, operation = %call.name, "awaiting handler");
        let (result, handler) = self.executor.execute(&call.name, &call.arguments)?;
        observer.on_delegation_complete(&result, handler);

        // ── SYNTHESIZING ─────────────────────────────────────────────────────
        debug!(turn_id = %turn_id, phase = %TurnPhase::Synthesizing, handler = %handler, "synthesizing reply");
        let function_result = serde_json::to_value(&result).unwrap_or_else(|_| json!({}));
        contents.push(decision.into_model_turn());
        contents.push(ConversationTurn::function_response(
            call.name.clone(),
            json!({ "result": function_result }),
        ));

        let synthesis = self.generator.generate(&GenerateRequest {
            system_directive: self.catalog.coordinator_directive().to_string(),
            tools: Vec::new(),
            temperature: None,
            contents,
        })?;

        let final_text = synthesis
            .text()
            .unwrap_or_else(|| SYNTHESIS_FALLBACK_TEXT.to_string());

        info!(turn_id = %turn_id, phase = %TurnPhase::Done, handler = %handler, "turn finished");
        Ok(TurnOutcome {
            turn_id,
            final_text,
            tool_used: Some(call.name),
            handler_type: handler,
            delegation: Some(result),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
