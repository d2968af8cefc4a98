//! Date and time tool

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::sync::Arc;

use crate::schema::{InputSchema, Tool, ToolContext, ToolError, ToolSchema};

/// Source of the current time
///
/// Injected so the tool is deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed point in time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Tool reporting the current date and time
pub struct ClockTool {
    clock: Arc<dyn Clock>,
}

impl ClockTool {
    /// Create with the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create with an injected clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for ClockTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &str {
        "get_current_date_and_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input: InputSchema::object(),
        }
    }

    async fn execute(&self, _context: &ToolContext, _input: Value) -> Result<String, ToolError> {
        let now = self.clock.now();
        tracing::info!("tool called: get_current_date_and_time()");

        // Weekday, month, day, year, then 12-hour time with AM/PM
        let formatted = now.format("%A, %B %d, %Y at %I:%M %p");
        Ok(format!("The current date and time is {formatted}"))
    }
}
