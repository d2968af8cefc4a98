//! Weather lookup tool
//!
//! Placeholder implementation; swap the body for a real weather API client
//! when one is wired in.

use async_trait::async_trait;
use serde_json::Value;

use crate::schema::{InputSchema, ParamType, Tool, ToolContext, ToolError, ToolSchema};

/// Tool answering weather questions for a location
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the weather for a given location."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input: InputSchema::object().property(
                "location",
                ParamType::String,
                "The location to get weather for",
                true,
            ),
        }
    }

    async fn execute(&self, _context: &ToolContext, input: Value) -> Result<String, ToolError> {
        let location = input
            .get("location")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::invalid_params("location is required"))?;

        tracing::info!(location, "tool called: get_weather");

        Ok(format!(
            "I don't have real-time weather data yet, but you asked about the weather in {location}."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_weather_names_location() {
        let tool = WeatherTool::new();
        let payload = tool
            .execute(&ToolContext::new("s1"), json!({"location": "Paris"}))
            .await
            .unwrap();

        assert!(payload.contains("Paris"));
    }

    #[tokio::test]
    async fn test_weather_requires_location() {
        let tool = WeatherTool::new();
        let err = tool
            .execute(&ToolContext::new("s1"), json!({}))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_weather_schema_declares_location() {
        let schema = WeatherTool::new().schema();
        let params = schema.input.params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "location");
        assert!(params[0].required);
    }
}
