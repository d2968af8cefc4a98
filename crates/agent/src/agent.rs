//! Agent definition
//!
//! An agent is configuration, not behavior: a system prompt paired with a
//! tool registry. Multiple independent agent configurations can coexist at
//! runtime; a session references exactly one for its whole lifetime.

use std::sync::Arc;

use parlance_core::ToolDefinition;
use parlance_tools::ToolRegistry;

/// Default instructions for a general-purpose voice assistant
const DEFAULT_INSTRUCTIONS: &str = "You are a helpful voice assistant. \
Your interface with users will be voice-based. \
Keep your responses concise and conversational. \
You have access to tools that you can use to help users. \
Avoid using complex formatting, emojis, or symbols in your responses.";

/// Agent configuration: instructions plus callable tools
///
/// Immutable after construction.
pub struct Agent {
    name: String,
    instructions: String,
    tools: Arc<ToolRegistry>,
}

impl Agent {
    /// Create an agent with explicit instructions
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools,
        }
    }

    /// General-purpose voice assistant over the given tools
    pub fn assistant(tools: Arc<ToolRegistry>) -> Self {
        Self::new("assistant", DEFAULT_INSTRUCTIONS, tools)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Tool definitions advertised to the language model
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_tools::builtin_registry;

    #[test]
    fn test_assistant_defaults() {
        let tools = Arc::new(builtin_registry().unwrap());
        let agent = Agent::assistant(tools);

        assert_eq!(agent.name(), "assistant");
        assert!(agent.instructions().contains("voice"));
        assert_eq!(agent.tool_definitions().len(), 2);
    }

    #[test]
    fn test_custom_agent() {
        let agent = Agent::new(
            "concierge",
            "You book hotel rooms.",
            Arc::new(ToolRegistry::new()),
        );

        assert_eq!(agent.name(), "concierge");
        assert!(agent.tool_definitions().is_empty());
    }
}
