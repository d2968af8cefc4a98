//! Tool registry
//!
//! Holds the set of tools exposed to the language model. Registration order
//! is preserved; after registration the registry is read-only and safe to
//! share across sessions behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use parlance_core::ToolDefinition;

use crate::schema::{Tool, ToolSchema};

/// Registration failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

/// Tool registry
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool
    ///
    /// Fails if a tool with the same name already exists; the earlier
    /// registration is left in place.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), RegistrationError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistrationError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistrationError::Duplicate(name));
        }

        tracing::debug!(tool = %name, "registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&idx| &self.tools[idx])
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterate tool descriptors in registration order
    ///
    /// The sequence is lazy and restartable: each call yields a fresh
    /// iterator over the current registrations.
    pub fn list(&self) -> impl Iterator<Item = ToolSchema> + '_ {
        self.tools.iter().map(|t| t.schema())
    }

    /// Tool definitions for advertising to the language model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.list().map(|schema| schema.definition()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InputSchema, ToolContext, ToolError};
    use async_trait::async_trait;
    use serde_json::Value;

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.0.to_string(),
                description: self.description().to_string(),
                input: InputSchema::object(),
            }
        }

        async fn execute(&self, _ctx: &ToolContext, _input: Value) -> Result<String, ToolError> {
            Ok("ok".to_string())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(NamedTool("alpha")).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.has("alpha"));
        assert!(registry.lookup("alpha").is_some());
        assert!(registry.lookup("beta").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails_and_keeps_first() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool("alpha")).unwrap();

        let err = registry.register(NamedTool("alpha")).unwrap_err();
        assert_eq!(err, RegistrationError::Duplicate("alpha".to_string()));

        // Registry still contains exactly the first registration
        assert_eq!(registry.len(), 1);
        assert!(registry.has("alpha"));
    }

    #[test]
    fn test_list_is_restartable_and_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool("zulu")).unwrap();
        registry.register(NamedTool("alpha")).unwrap();

        let first: Vec<String> = registry.list().map(|s| s.name).collect();
        let second: Vec<String> = registry.list().map(|s| s.name).collect();

        // Registration order, not alphabetical; same result on restart
        assert_eq!(first, vec!["zulu", "alpha"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_definitions_advertise_all_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool("alpha")).unwrap();
        registry.register(NamedTool("beta")).unwrap();

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "alpha");
    }
}
