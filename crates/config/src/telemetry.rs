//! Tracing initialisation

use tracing_subscriber::EnvFilter;

use crate::ObservabilitySettings;

/// Initialise the global tracing subscriber from observability settings
///
/// RUST_LOG takes precedence when set; otherwise the configured log level
/// (itself overridable via LOG_LEVEL) is used. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(settings: &ObservabilitySettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let settings = ObservabilitySettings::default();
        init_tracing(&settings);
        init_tracing(&settings);
    }
}
