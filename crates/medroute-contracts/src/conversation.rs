//! Conversation and text-generation request/response types.
//!
//! These mirror the shape every text-generation capability must accept: one
//! system directive, an optional tool catalog, a temperature, and an ordered
//! list of turns. A response is a list of parts; each part is either text or
//! a structured call into the catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a conversation turn.
///
/// `Function` is only used for the function-result turn carried into the
/// synthesis call; histories handed in by callers contain `User` and `Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Function,
}

/// A structured call the decision capability made into the tool catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCall {
    /// The declaration name being invoked.
    pub name: String,
    /// Argument object. Validated against the declaration's schema before use.
    pub arguments: Value,
}

/// One piece of a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FunctionCall(StructuredCall),
    FunctionResponse {
        name: String,
        response: Value,
    },
}

/// One turn of the conversation sent to the text-generation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A function-result turn carrying `response` for the call named `name`.
    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Self {
            role: Role::Function,
            parts: vec![Part::FunctionResponse {
                name: name.into(),
                response,
            }],
        }
    }

    /// Concatenated text of every `Text` part, or `None` when there is none.
    pub fn text(&self) -> Option<String> {
        join_text(&self.parts)
    }
}

/// Declarative description of one invocable operation.
///
/// `parameters` is a JSON Schema document. For every catalog entry it
/// describes an object with exactly one required string property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A single request to the text-generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Persona and policy the model must follow for this call.
    pub system_directive: String,
    /// Tool catalog offered to the model. Empty means "no tools".
    pub tools: Vec<ToolDeclaration>,
    /// Sampling temperature. `None` leaves the provider default in place.
    pub temperature: Option<f32>,
    /// Ordered conversation, oldest first.
    pub contents: Vec<ConversationTurn>,
}

/// The capability's answer: the parts of the first candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn from_call(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            parts: vec![Part::FunctionCall(StructuredCall {
                name: name.into(),
                arguments,
            })],
        }
    }

    /// Concatenated text, or `None` when the response carried no non-empty text.
    pub fn text(&self) -> Option<String> {
        join_text(&self.parts)
    }

    /// The first structured call, if any. Later calls are ignored.
    pub fn first_call(&self) -> Option<&StructuredCall> {
        self.parts.iter().find_map(|part| match part {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }

    /// Re-wrap this response as the model turn that produced it.
    pub fn into_model_turn(self) -> ConversationTurn {
        ConversationTurn {
            role: Role::Model,
            parts: self.parts,
        }
    }
}

fn join_text(parts: &[Part]) -> Option<String> {
    let text: String = parts
        .iter()
        .filter_map(|part| match part {
            Part::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
