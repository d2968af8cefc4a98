//! Language model trait

use async_trait::async_trait;

use crate::{Completion, Result, ToolDefinition, Turn};

/// Language model interface
///
/// One call completes one model turn over the conversation so far. The
/// returned completion may carry tool call requests; the session resolves
/// those and calls `complete` again with the tool results appended, until
/// the model produces plain text.
#[async_trait]
pub trait LanguageModel: std::fmt::Debug + Send + Sync + 'static {
    /// Complete the next model turn
    ///
    /// # Arguments
    /// * `conversation` - Turn history, oldest first
    /// * `tools` - Tool definitions the model may call
    async fn complete(
        &self,
        conversation: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Completion>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}
