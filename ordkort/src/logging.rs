//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str) -> String {
    format!("ordkort={},ordkort_agent={},info", log_level, log_level)
}

/// Install the global subscriber. `format` is `pretty` or `json`.
pub fn init(log_level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert_eq!(directive, "ordkort=debug,ordkort_agent=debug,info");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
