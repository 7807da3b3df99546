//! Conversation sessions: an append-only transcript around a coordinator.
//!
//! A `Session` owns the transcript and derives the model-facing history from
//! it. Every turn runs against a snapshot of that history; the transcript is
//! only extended once the turn has produced a reply, so a failed turn leaves
//! the session exactly as it was.

use std::cell::RefCell;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medroute_contracts::{
    conversation::ConversationTurn,
    delegation::{DelegationResult, TurnOutcome},
    error::MedrouteResult,
    handler::{HandlerType, SessionId},
};

use crate::{
    catalog::ToolCatalog,
    coordinator::Coordinator,
    traits::DelegationObserver,
};

/// What the caller should show when a turn aborts.
pub const CONNECTIVITY_ERROR_TEXT: &str =
    "Error: Gagal terhubung ke Koordinator Pusat (Cek API Key).";

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    User,
    Coordinator,
    System,
    Agent,
}

/// Optional details attached to a transcript entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub agent_name: Option<String>,
    pub is_tool_call: bool,
    pub tool_name: Option<String>,
    /// Wall time of the whole turn, set on the coordinator's reply.
    pub processing_time_ms: Option<u64>,
    /// Set on the coordinator's reply.
    pub handler_type: Option<HandlerType>,
}

/// One line of the session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: uuid::Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: EntryMetadata,
}

impl TranscriptEntry {
    fn new(sender: Sender, text: impl Into<String>, metadata: EntryMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// A conversation with the coordinator.
///
/// `send` takes `&mut self`, so at most one turn per session is in flight.
pub struct Session {
    id: SessionId,
    coordinator: Coordinator,
    transcript: Vec<TranscriptEntry>,
}

impl Session {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            id: SessionId::new(),
            coordinator,
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// The model-facing history: user entries as `user`, everything else as
    /// `model`.
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.transcript
            .iter()
            .map(|entry| match entry.sender {
                Sender::User => ConversationTurn::user(entry.text.clone()),
                _ => ConversationTurn::model(entry.text.clone()),
            })
            .collect()
    }

    /// Run one turn and, on success, append it to the transcript.
    ///
    /// `observer` receives the delegation events as they happen. The system
    /// and agent entries those events produce are buffered and committed with
    /// the user message and the reply.
    ///
    /// # Errors
    ///
    /// Whatever `Coordinator::submit_turn` returns. The transcript is left
    /// untouched; show `CONNECTIVITY_ERROR_TEXT` to the user.
    pub fn send(
        &mut self,
        message: &str,
        observer: &dyn DelegationObserver,
    ) -> MedrouteResult<TurnOutcome> {
        let started = Instant::now();
        let snapshot = self.history();
        let user_entry = TranscriptEntry::new(Sender::User, message, EntryMetadata::default());

        let recorder = TranscriptRecorder {
            catalog: self.coordinator.catalog(),
            inner: observer,
            pending: RefCell::new(Vec::new()),
        };

        let outcome = match self.coordinator.submit_turn(&snapshot, message, &recorder) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "turn aborted, transcript unchanged");
                return Err(e);
            }
        };

        let pending = recorder.pending.into_inner();
        let reply = TranscriptEntry::new(
            Sender::Coordinator,
            outcome.final_text.clone(),
            EntryMetadata {
                tool_name: outcome.tool_used.clone(),
                processing_time_ms: Some(started.elapsed().as_millis() as u64),
                handler_type: Some(outcome.handler_type),
                ..EntryMetadata::default()
            },
        );

        self.transcript.push(user_entry);
        self.transcript.extend(pending);
        self.transcript.push(reply);

        info!(
            session_id = %self.id,
            turn_id = %outcome.turn_id,
            handler = %outcome.handler_type,
            transcript_len = self.transcript.len(),
            "turn committed"
        );
        Ok(outcome)
    }
}

/// Forwards delegation events to the caller's observer and buffers the
/// transcript entries they imply.
struct TranscriptRecorder<'a> {
    catalog: &'a ToolCatalog,
    inner: &'a dyn DelegationObserver,
    pending: RefCell<Vec<TranscriptEntry>>,
}

impl TranscriptRecorder<'_> {
    fn agent_name(&self, operation: &str) -> Option<String> {
        self.catalog
            .entry_for_operation(operation)
            .map(|e| e.display_name.clone())
    }
}

impl DelegationObserver for TranscriptRecorder<'_> {
    fn on_delegation_start(&self, operation: &str) {
        self.inner.on_delegation_start(operation);

        // Unknown operations get no announcement; the turn is about to fail.
        if let Some(agent_name) = self.agent_name(operation) {
            self.pending.borrow_mut().push(TranscriptEntry::new(
                Sender::System,
                format!("KOORDINATOR: Meneruskan permintaan ke {agent_name}..."),
                EntryMetadata {
                    agent_name: Some(agent_name),
                    is_tool_call: true,
                    tool_name: Some(operation.to_string()),
                    ..EntryMetadata::default()
                },
            ));
        }
    }

    fn on_delegation_complete(&self, result: &DelegationResult, handler: HandlerType) {
        self.inner.on_delegation_complete(result, handler);

        let text = if result.analysis.is_empty() {
            let raw = serde_json::to_string_pretty(result).unwrap_or_default();
            format!("RAW OUTPUT: {raw}")
        } else {
            format!("[ANALISIS CERDAS SUB-AGEN]\n{}", result.analysis)
        };
        let agent_name = self
            .catalog
            .entry_for_handler(handler)
            .map(|e| e.display_name.clone());

        self.pending.borrow_mut().push(TranscriptEntry::new(
            Sender::Agent,
            text,
            EntryMetadata {
                agent_name,
                ..EntryMetadata::default()
            },
        ));
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
