//! LLM exchange types
//!
//! Types crossing the boundary between the session core and the language
//! model collaborator: advertised tool definitions, model-issued tool call
//! requests, and the completion for one model turn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool definition advertised to the language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON schema for parameters
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Tool call issued by the model
///
/// Ephemeral: one batch of these exists per model turn and is consumed by
/// the tool invoker before the turn is finalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call ID, echoed back with the result
    pub id: String,
    /// Tool name
    pub name: String,
    /// Raw arguments as produced by the model
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: Map::new(),
        }
    }

    /// Add an argument (builder style)
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get argument as string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// One completed model turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// Tool calls the model wants resolved before finalizing
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Completion {
    /// Create a plain text completion
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a completion that requests tool calls
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: String::new(),
            tool_calls: calls,
        }
    }

    /// Check if the turn requests tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
