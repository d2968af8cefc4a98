//! Built-in tools

pub mod clock;
pub mod weather;

pub use clock::{Clock, ClockTool, FixedClock, SystemClock};
pub use weather::WeatherTool;

use crate::registry::{RegistrationError, ToolRegistry};

/// Registry pre-populated with the built-in tools
pub fn builtin_registry() -> Result<ToolRegistry, RegistrationError> {
    let mut registry = ToolRegistry::new();
    registry.register(ClockTool::new())?;
    registry.register(WeatherTool::new())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.has("get_current_date_and_time"));
        assert!(registry.has("get_weather"));
    }
}
