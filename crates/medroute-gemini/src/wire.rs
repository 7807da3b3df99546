//! JSON bodies of the `generateContent` endpoint.
//!
//! The REST API speaks camelCase and expects upper-case OpenAPI type names
//! (`OBJECT`, `STRING`) in function parameter schemas. Everything here is a
//! straight mapping to and from the runtime's conversation types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use medroute_contracts::conversation::{
    ConversationTurn, GenerateRequest, GenerateResponse, Part, Role, StructuredCall,
    ToolDeclaration,
};

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    pub system_instruction: WireContent,
    pub contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTool {
    pub function_declarations: Vec<WireFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct WireGenerationConfig {
    pub temperature: f32,
}

// ── Shared ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<WireFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<WireFunctionResponse>,
    /// Set on reasoning summaries; those never reach the runtime.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionResponse {
    pub name: String,
    pub response: Value,
}

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    #[serde(default)]
    pub candidates: Vec<WireCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCandidate {
    #[serde(default)]
    pub content: Option<WireContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl WireRequest {
    pub fn from_request(request: &GenerateRequest) -> Self {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![WireTool {
                function_declarations: request.tools.iter().map(declaration).collect(),
            }]
        };

        Self {
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some(request.system_directive.clone()),
                    ..WirePart::default()
                }],
            },
            contents: request.contents.iter().map(content).collect(),
            tools,
            generation_config: request
                .temperature
                .map(|temperature| WireGenerationConfig { temperature }),
        }
    }
}

impl WireResponse {
    /// Parts of the first candidate. No candidate yields an empty response.
    pub fn into_response(self) -> GenerateResponse {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(part_from_wire).collect())
            .unwrap_or_default();
        GenerateResponse { parts }
    }
}

fn declaration(tool: &ToolDeclaration) -> WireFunctionDeclaration {
    WireFunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: upper_case_types(&tool.parameters),
    }
}

fn content(turn: &ConversationTurn) -> WireContent {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "model",
        Role::Function => "function",
    };
    WireContent {
        role: Some(role.to_string()),
        parts: turn.parts.iter().map(part_to_wire).collect(),
    }
}

fn part_to_wire(part: &Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart {
            text: Some(text.clone()),
            ..WirePart::default()
        },
        Part::FunctionCall(call) => WirePart {
            function_call: Some(WireFunctionCall {
                name: call.name.clone(),
                args: call.arguments.clone(),
            }),
            ..WirePart::default()
        },
        Part::FunctionResponse { name, response } => WirePart {
            function_response: Some(WireFunctionResponse {
                name: name.clone(),
                response: response.clone(),
            }),
            ..WirePart::default()
        },
    }
}

fn part_from_wire(part: WirePart) -> Option<Part> {
    if part.thought {
        return None;
    }
    if let Some(call) = part.function_call {
        let arguments = if call.args.is_null() {
            Value::Object(Map::new())
        } else {
            call.args
        };
        return Some(Part::FunctionCall(StructuredCall {
            name: call.name,
            arguments,
        }));
    }
    if let Some(response) = part.function_response {
        return Some(Part::FunctionResponse {
            name: response.name,
            response: response.response,
        });
    }
    part.text.map(Part::Text)
}

/// Copy of `schema` with every `"type"` string upper-cased.
pub fn upper_case_types(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => upper_case_types(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(upper_case_types).collect()),
        other => other.clone(),
    }
}
