// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::batch_processing::MAX_WORKER_THREADS;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to require the `.java` extension on explicitly named files
    pub require_source_extension: bool,

    /// Whether to log timing for every processed file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_source_extension: env::var(env_vars::REQUIRE_SOURCE_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPreferences {
    /// Worker threads for parallel processing (capped at the compile-time maximum)
    pub max_threads: usize,

    /// Stop at the first failing file
    pub fail_fast: bool,

    /// Descend into subdirectories during discovery
    pub recursive: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            max_threads: env::var(env_vars::MAX_THREADS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4)
                .clamp(1, MAX_WORKER_THREADS),
            fail_fast: env::var(env_vars::FAIL_FAST)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            recursive: env::var(env_vars::RECURSIVE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum log level
    pub min_log_level: LogLevel,

    /// Whether to print the cargo-style error report
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Read every preference from the environment
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_SOURCE_EXTENSION: &str = "JCYO_REQUIRE_SOURCE_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "JCYO_ENABLE_PERFORMANCE_LOGGING";

    // Batch
    pub const MAX_THREADS: &str = "JCYO_MAX_THREADS";
    pub const FAIL_FAST: &str = "JCYO_FAIL_FAST";
    pub const RECURSIVE: &str = "JCYO_RECURSIVE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "JCYO_STRUCTURED_LOGGING";
    pub const LOGGING_ENABLE_CONSOLE: &str = "JCYO_CONSOLE_LOGGING";
    pub const LOGGING_MIN_LEVEL: &str = "JCYO_LOG_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "JCYO_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "JCYO_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_thread_preference_is_capped() {
        let preferences = BatchPreferences::default();
        assert!(preferences.max_threads >= 1);
        assert!(preferences.max_threads <= MAX_WORKER_THREADS);
    }

    #[test]
    fn test_env_var_names_are_prefixed() {
        for name in [
            env_vars::MAX_THREADS,
            env_vars::FAIL_FAST,
            env_vars::LOGGING_MIN_LEVEL,
            env_vars::LOGGING_USE_STRUCTURED,
        ] {
            assert!(name.starts_with("JCYO_"));
        }
    }
}
