//! Tool invocation dispatch
//!
//! Resolves model-issued tool calls against a registry: validates
//! arguments, runs the handler under its timeout, and returns a structured
//! result either way. A failing tool call is a result, not a fault; the
//! session keeps running and the model sees the failure text.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

use parlance_core::{ToolCallRequest, Turn};

use crate::registry::ToolRegistry;
use crate::schema::{InputSchema, ToolContext};

/// Why a tool call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFault {
    /// No tool with the requested name is registered
    UnknownTool,
    /// Arguments did not satisfy the tool's parameter schema
    InvalidArguments,
    /// The handler itself failed or timed out
    HandlerError,
}

impl std::fmt::Display for ToolFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ToolFault::UnknownTool => "unknown tool",
            ToolFault::InvalidArguments => "invalid arguments",
            ToolFault::HandlerError => "handler error",
        };
        write!(f, "{name}")
    }
}

/// Structured result of one tool call
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    pub success: bool,
    /// Handler output on success, failure detail otherwise
    pub payload: String,
    pub error: Option<ToolFault>,
}

impl ToolCallResult {
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: payload.into(),
            error: None,
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self {
            success: false,
            payload: format!("No tool named '{name}' is registered"),
            error: Some(ToolFault::UnknownTool),
        }
    }

    pub fn invalid_arguments(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: detail.into(),
            error: Some(ToolFault::InvalidArguments),
        }
    }

    pub fn handler_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: message.into(),
            error: Some(ToolFault::HandlerError),
        }
    }

    /// Fold this result back into the conversation as a tool turn
    ///
    /// Failure text is surfaced verbatim so the model can retry with
    /// corrected arguments or phrase the failure to the user.
    pub fn as_turn(&self, request: &ToolCallRequest) -> Turn {
        let content = if self.success {
            self.payload.clone()
        } else {
            format!("Tool call failed: {}", self.payload)
        };
        Turn::tool(content, request.id.clone())
    }
}

/// Tool invocation dispatcher
pub struct ToolInvoker;

impl ToolInvoker {
    /// Resolve a single tool call request
    pub async fn invoke(
        registry: &ToolRegistry,
        request: &ToolCallRequest,
        context: &ToolContext,
    ) -> ToolCallResult {
        let Some(tool) = registry.lookup(&request.name) else {
            tracing::warn!(tool = %request.name, "tool call for unregistered tool");
            return ToolCallResult::unknown_tool(&request.name);
        };

        if let Err(detail) = validate_arguments(&request.name, &tool.schema().input, request) {
            tracing::warn!(tool = %request.name, %detail, "tool call arguments rejected");
            return ToolCallResult::invalid_arguments(detail);
        }

        let timeout_secs = tool.timeout_secs();
        tracing::info!(
            tool = %request.name,
            session = %context.session_id,
            timeout_secs,
            "executing tool"
        );

        let input = Value::Object(request.arguments.clone());
        let timeout = Duration::from_secs(timeout_secs);

        match tokio::time::timeout(timeout, tool.execute(context, input)).await {
            Ok(Ok(payload)) => ToolCallResult::ok(payload),
            Ok(Err(err)) => {
                tracing::warn!(tool = %request.name, error = %err, "tool handler failed");
                ToolCallResult::handler_error(err.to_string())
            }
            Err(_elapsed) => {
                tracing::warn!(tool = %request.name, timeout_secs, "tool execution timed out");
                ToolCallResult::handler_error(format!(
                    "tool '{}' timed out after {}s",
                    request.name, timeout_secs
                ))
            }
        }
    }

    /// Resolve one model turn's batch of tool calls
    ///
    /// Calls are dispatched concurrently with no shared mutable state; all
    /// results are collected before returning (join barrier), in request
    /// order.
    pub async fn invoke_all(
        registry: &ToolRegistry,
        requests: &[ToolCallRequest],
        context: &ToolContext,
    ) -> Vec<ToolCallResult> {
        join_all(
            requests
                .iter()
                .map(|request| Self::invoke(registry, request, context)),
        )
        .await
    }
}

/// Validate raw arguments against an ordered parameter schema
fn validate_arguments(
    tool_name: &str,
    schema: &InputSchema,
    request: &ToolCallRequest,
) -> Result<(), String> {
    for param in schema.params() {
        match request.arguments.get(&param.name) {
            None if param.required => {
                return Err(format!(
                    "missing required parameter '{}' for tool '{}'",
                    param.name, tool_name
                ));
            }
            Some(value) if !param.kind.accepts(value) => {
                return Err(format!(
                    "parameter '{}' of tool '{}' expects {}, got {}",
                    param.name,
                    tool_name,
                    param.kind,
                    json_type_name(value)
                ));
            }
            _ => {}
        }
    }

    let declared: std::collections::HashSet<&str> =
        schema.params().iter().map(|p| p.name.as_str()).collect();
    for key in request.arguments.keys() {
        if !declared.contains(key.as_str()) {
            return Err(format!(
                "unknown parameter '{}' for tool '{}'",
                key, tool_name
            ));
        }
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One recorded tool invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub arguments: Value,
    pub result: ToolCallResult,
    pub at: DateTime<Utc>,
}

/// Bounded per-session record of tool invocations
pub struct ToolCallTracker {
    calls: VecDeque<RecordedCall>,
    max_history: usize,
}

impl ToolCallTracker {
    pub fn new(max_history: usize) -> Self {
        Self {
            calls: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Record a completed call, evicting the oldest entry when full
    pub fn record(&mut self, request: &ToolCallRequest, result: ToolCallResult) {
        if self.calls.len() >= self.max_history {
            self.calls.pop_front();
        }
        self.calls.push_back(RecordedCall {
            name: request.name.clone(),
            arguments: Value::Object(request.arguments.clone()),
            result,
            at: Utc::now(),
        });
    }

    /// All recorded calls, oldest first
    pub fn all(&self) -> impl Iterator<Item = &RecordedCall> {
        self.calls.iter()
    }

    /// Calls for one tool name
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RecordedCall> {
        self.calls.iter().filter(move |c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamType, Tool, ToolError, ToolSchema};
    use async_trait::async_trait;

    struct GreetTool;

    #[async_trait]
    impl Tool for GreetTool {
        fn name(&self) -> &str {
            "greet"
        }

        fn description(&self) -> &str {
            "Greet someone by name"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input: InputSchema::object()
                    .property("name", ParamType::String, "Who to greet", true)
                    .property("shout", ParamType::Boolean, "Use uppercase", false),
            }
        }

        async fn execute(&self, _ctx: &ToolContext, input: Value) -> Result<String, ToolError> {
            let name = input
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ToolError::invalid_params("name is required"))?;
            Ok(format!("Hello, {name}!"))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "unavailable_source"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input: InputSchema::object(),
            }
        }

        async fn execute(&self, _ctx: &ToolContext, _input: Value) -> Result<String, ToolError> {
            Err(ToolError::execution("data source unavailable"))
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }

        fn description(&self) -> &str {
            "Sleeps past its timeout"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input: InputSchema::object(),
            }
        }

        async fn execute(&self, _ctx: &ToolContext, _input: Value) -> Result<String, ToolError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }

        fn timeout_secs(&self) -> u64 {
            1
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool).unwrap();
        registry.register(FailingTool).unwrap();
        registry
    }

    fn ctx() -> ToolContext {
        ToolContext::new("test-session")
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let request = ToolCallRequest::new("c1", "greet").with_arg("name", "Ada");
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(result.success);
        assert_eq!(result.payload, "Hello, Ada!");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let request = ToolCallRequest::new("c1", "nonexistent");
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::UnknownTool));
        assert!(result.payload.contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_invoke_missing_required_argument() {
        let request = ToolCallRequest::new("c1", "greet");
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::InvalidArguments));
        assert!(result.payload.contains("name"));
    }

    #[tokio::test]
    async fn test_invoke_wrong_argument_type() {
        let request = ToolCallRequest::new("c1", "greet")
            .with_arg("name", "Ada")
            .with_arg("shout", "yes");
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::InvalidArguments));
        assert!(result.payload.contains("shout"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_argument() {
        let request = ToolCallRequest::new("c1", "greet")
            .with_arg("name", "Ada")
            .with_arg("volume", 11);
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::InvalidArguments));
    }

    #[tokio::test]
    async fn test_handler_failure_is_caught() {
        let request = ToolCallRequest::new("c1", "unavailable_source");
        let result = ToolInvoker::invoke(&registry(), &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::HandlerError));
        assert!(result.payload.contains("data source unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_timeout_is_caught() {
        let mut registry = ToolRegistry::new();
        registry.register(SlowTool).unwrap();

        let request = ToolCallRequest::new("c1", "slow");
        let result = ToolInvoker::invoke(&registry, &request, &ctx()).await;

        assert!(!result.success);
        assert_eq!(result.error, Some(ToolFault::HandlerError));
        assert!(result.payload.contains("timed out"));
    }

    #[tokio::test]
    async fn test_invoke_all_joins_in_request_order() {
        let requests = vec![
            ToolCallRequest::new("c1", "greet").with_arg("name", "Ada"),
            ToolCallRequest::new("c2", "unavailable_source"),
            ToolCallRequest::new("c3", "nonexistent"),
        ];

        let results = ToolInvoker::invoke_all(&registry(), &requests, &ctx()).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert_eq!(results[1].error, Some(ToolFault::HandlerError));
        assert_eq!(results[2].error, Some(ToolFault::UnknownTool));
    }

    #[test]
    fn test_result_as_turn() {
        let request = ToolCallRequest::new("c9", "greet");

        let ok = ToolCallResult::ok("Hello!").as_turn(&request);
        assert_eq!(ok.content, "Hello!");
        assert_eq!(ok.tool_call_id.as_deref(), Some("c9"));

        let failed = ToolCallResult::unknown_tool("greet").as_turn(&request);
        assert!(failed.content.starts_with("Tool call failed:"));
    }

    #[test]
    fn test_tracker_bounds_history() {
        let mut tracker = ToolCallTracker::new(2);
        let request = ToolCallRequest::new("c1", "greet");

        tracker.record(&request, ToolCallResult::ok("one"));
        tracker.record(&request, ToolCallResult::ok("two"));
        tracker.record(&request, ToolCallResult::ok("three"));

        assert_eq!(tracker.len(), 2);
        let payloads: Vec<&str> = tracker.all().map(|c| c.result.payload.as_str()).collect();
        assert_eq!(payloads, vec!["two", "three"]);
        assert_eq!(tracker.by_name("greet").count(), 2);
    }

    #[test]
    fn test_validate_arguments_accepts_optional_missing() {
        let request = ToolCallRequest::new("c1", "greet").with_arg("name", "Ada");
        let schema = GreetTool.schema();
        assert!(validate_arguments("greet", &schema.input, &request).is_ok());
    }
}
