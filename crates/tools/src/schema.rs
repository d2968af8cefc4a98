//! Tool trait and parameter schema types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use parlance_core::ToolDefinition;

/// Default timeout for tool execution (30 seconds)
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Check whether a JSON value is convertible to this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One declared parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
}

/// Ordered parameter schema for a tool
///
/// Declaration order is preserved; it is part of what gets advertised to
/// the language model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    /// Start an empty object schema
    pub fn object() -> Self {
        Self::default()
    }

    /// Declare a parameter (builder style)
    pub fn property(
        mut self,
        name: impl Into<String>,
        kind: ParamType,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            description: description.into(),
            required,
        });
        self
    }

    /// Declared parameters in declaration order
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Render as a JSON-Schema-shaped object for the LLM collaborator
    pub fn to_json(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Tool descriptor: name, description, and parameter schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input: InputSchema,
}

impl ToolSchema {
    /// Convert into the definition advertised to the language model
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(&self.name, &self.description, self.input.to_json())
    }
}

/// Run context handed to tool handlers
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Session the call belongs to
    pub session_id: String,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Error raised by a tool handler
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("execution failed: {0}")]
    Execution(String),

    #[error("tool '{name}' timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },
}

impl ToolError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        ToolError::InvalidParams(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        ToolError::Execution(message.into())
    }

    pub fn timeout(name: impl Into<String>, seconds: u64) -> Self {
        ToolError::Timeout {
            name: name.into(),
            seconds,
        }
    }
}

/// A callable tool exposed to the language model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name within a registry
    fn name(&self) -> &str;

    /// Human-readable description shown to the model
    fn description(&self) -> &str;

    /// Parameter schema
    fn schema(&self) -> ToolSchema;

    /// Run the tool with validated arguments
    ///
    /// Handlers may perform external I/O or pure computation; every call is
    /// re-executed, never cached.
    async fn execute(&self, context: &ToolContext, input: Value) -> Result<String, ToolError>;

    /// Per-tool execution timeout
    fn timeout_secs(&self) -> u64 {
        DEFAULT_TOOL_TIMEOUT_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::String.accepts(&json!("x")));
        assert!(!ParamType::String.accepts(&json!(1)));
        assert!(ParamType::Integer.accepts(&json!(1)));
        assert!(!ParamType::Integer.accepts(&json!(1.5)));
        assert!(ParamType::Number.accepts(&json!(1.5)));
        assert!(ParamType::Number.accepts(&json!(3))); // integers convert to numbers
        assert!(ParamType::Boolean.accepts(&json!(true)));
    }

    #[test]
    fn test_input_schema_preserves_order() {
        let schema = InputSchema::object()
            .property("b", ParamType::String, "second letter", true)
            .property("a", ParamType::Integer, "first letter", false);

        let names: Vec<&str> = schema.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_schema_to_json() {
        let schema = InputSchema::object().property(
            "location",
            ParamType::String,
            "The location to get weather for",
            true,
        );

        let value = schema.to_json();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["location"]["type"], "string");
        assert_eq!(value["required"][0], "location");
    }
}
