//! Integration tests for logging system

use bridge_traits::time::LogLevel;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[test]
fn test_format_selection() {
    // Debug builds should default to Pretty
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    // Release builds should default to JSON
    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_health=notalevel");
    let err = init_logging(config).unwrap_err();

    assert!(err.to_string().contains("Invalid log filter"));
}

// Only one global subscriber may exist per test binary, so both the first
// initialization and the duplicate are checked in a single test.
#[test]
fn test_init_logging_only_once() {
    let config = LoggingConfig::default().with_format(LogFormat::Compact);
    init_logging(config.clone()).expect("first initialization should succeed");

    let err = init_logging(config).unwrap_err();
    assert!(err.to_string().contains("Failed to initialize logging"));
}
