//! Structured logging setup for appscribe
//!
//! Initializes the `tracing` subscriber once per process. Output always goes to
//! stderr so that catalog and extraction output on stdout stays machine-readable.
//!
//! # Example
//!
//! ```no_run
//! use appscribe::util::logging;
//!
//! // No flags given: falls back to APPSCRIBE_LOG_LEVEL, then INFO
//! logging::init_from_args(None, false, false);
//!
//! tracing::info!(applications = 42, "Building catalog");
//! ```

use crate::config::parse_flag;
use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for appscribe's own events
    pub level: Level,

    /// Emit one JSON object per event instead of formatted lines
    pub use_json: bool,

    /// Include the module target (e.g., appscribe::pipeline) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread ID and name in logs
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    /// INFO level, formatted output, targets on, no location or thread ids
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

/// Parses a log level from a string, case-insensitively.
///
/// Unknown values fall back to `Level::INFO` with a notice on stderr.
///
/// ```
/// use appscribe::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Picks the level from command line flags, falling back to `APPSCRIBE_LOG_LEVEL`.
///
/// An explicit level wins over `verbose`, which wins over `quiet`.
pub fn resolve_level(log_level: Option<&str>, verbose: bool, quiet: bool) -> Level {
    if let Some(level_str) = log_level {
        parse_level(level_str)
    } else if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        let level_str = env::var("APPSCRIBE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    }
}

fn json_from_env() -> bool {
    env::var("APPSCRIBE_LOG_JSON")
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// Initializes the logging system. Calls after the first are ignored.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("appscribe={}", config.level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        }
    });
}

/// Builds the configuration for the command line from `--log-level`, `-v`, `-q`
/// and `APPSCRIBE_LOG_JSON`. JSON output also carries source location and thread ids.
pub fn config_from_args(log_level: Option<&str>, verbose: bool, quiet: bool) -> LoggingConfig {
    let use_json = json_from_env();
    LoggingConfig {
        level: resolve_level(log_level, verbose, quiet),
        use_json,
        include_location: use_json,
        include_thread_ids: use_json,
        ..Default::default()
    }
}

/// Initializes logging for the command line
pub fn init_from_args(log_level: Option<&str>, verbose: bool, quiet: bool) {
    init_logging(config_from_args(log_level, verbose, quiet));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    #[serial]
    fn test_resolve_level_precedence() {
        env::remove_var("APPSCRIBE_LOG_LEVEL");
        assert_eq!(resolve_level(Some("warn"), true, false), Level::WARN);
        assert_eq!(resolve_level(None, true, false), Level::DEBUG);
        assert_eq!(resolve_level(None, false, true), Level::ERROR);
        assert_eq!(resolve_level(None, false, false), Level::INFO);

        env::set_var("APPSCRIBE_LOG_LEVEL", "trace");
        assert_eq!(resolve_level(None, false, false), Level::TRACE);
        env::remove_var("APPSCRIBE_LOG_LEVEL");
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(config.include_target);
        assert!(!config.include_location);
        assert!(!config.include_thread_ids);
    }

    #[test]
    #[serial]
    fn test_config_from_args_text() {
        env::remove_var("APPSCRIBE_LOG_JSON");
        let config = config_from_args(Some("debug"), false, false);
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.use_json);
        assert!(!config.include_location);
    }

    #[test]
    #[serial]
    fn test_config_from_args_json() {
        env::set_var("APPSCRIBE_LOG_JSON", "1");
        let config = config_from_args(None, false, true);
        env::remove_var("APPSCRIBE_LOG_JSON");

        assert_eq!(config.level, Level::ERROR);
        assert!(config.use_json);
        assert!(config.include_location);
        assert!(config.include_thread_ids);
    }
}
