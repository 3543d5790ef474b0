//! Logging for jcyo
//!
//! The macros ([`log_error!`](crate::log_error), [`log_warning!`](crate::log_warning),
//! [`log_success!`](crate::log_success), [`log_info!`](crate::log_info),
//! [`log_debug!`](crate::log_debug)) hand their event to one global
//! [`Dispatcher`]. The dispatcher writes it through the configured [`Logger`]
//! and, when a file is current on this thread, files warnings and errors under
//! that file in the [`RunReport`]. Until [`init_global_logging`] runs, every
//! macro is a no-op, so the library can be used without any logging setup.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod report;
pub mod sink;

use crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
use crate::config::runtime::LoggingPreferences;
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use report::{FileReport, FileStats, RunReport, RunSummary};
pub use sink::{Logger, Sink};

#[derive(Debug, thiserror::Error)]
#[error("Logging is already initialized")]
pub struct AlreadyInitialized;

// ============================================================================
// FILE CONTEXT
// ============================================================================

/// The file a thread is working on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub path: PathBuf,
    pub id: usize,
}

thread_local! {
    static CURRENT_FILE: RefCell<Option<FileContext>> = const { RefCell::new(None) };
}

/// Run `f` with `path` as this thread's current file, then restore the previous one
pub fn with_file_context<F, R>(path: PathBuf, id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    if let Some(dispatcher) = DISPATCHER.get() {
        dispatcher.report.record_file(&path, id);
    }
    let previous = CURRENT_FILE.with(|current| current.replace(Some(FileContext { path, id })));
    let result = f();
    CURRENT_FILE.with(|current| *current.borrow_mut() = previous);
    result
}

pub fn current_file() -> Option<FileContext> {
    CURRENT_FILE.with(|current| current.borrow().clone())
}

// ============================================================================
// DISPATCHER
// ============================================================================

pub struct Dispatcher {
    logger: Logger,
    report: RunReport,
    cargo_style: bool,
}

impl Dispatcher {
    pub fn new(logger: Logger, cargo_style: bool) -> Self {
        Self {
            logger,
            report: RunReport::new(),
            cargo_style,
        }
    }

    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        Self::new(
            Logger::from_preferences(preferences),
            preferences.enable_cargo_style_output,
        )
    }

    /// Diagnostics always reach the report, whatever the logger lets through
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= LogLevel::Warning || self.logger.enabled(level)
    }

    pub fn emit(&self, level: LogLevel, code: Code, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
        let mut event = LogEvent::new(level, code, truncate(message));
        for (key, value) in fields {
            event = event.with_field(key, value);
        }

        let file = current_file();
        if let Some(file) = &file {
            event = event.in_file(file.path.clone());
        }

        self.logger.log(&event);
        if let Some(file) = file {
            self.report.record_event(&file.path, event);
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }
}

fn truncate(message: &str) -> &str {
    if message.len() <= MAX_LOG_MESSAGE_LENGTH {
        return message;
    }
    let mut cut = MAX_LOG_MESSAGE_LENGTH;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    &message[..cut]
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

pub fn init_global_logging(preferences: &LoggingPreferences) -> Result<(), AlreadyInitialized> {
    init_with_dispatcher(Dispatcher::from_preferences(preferences))?;
    crate::log_success!(codes::success::LOGGING_READY, "Logging initialized",
        "min_level" => preferences.min_log_level.as_str()
    );
    Ok(())
}

pub fn init_with_dispatcher(dispatcher: Dispatcher) -> Result<(), AlreadyInitialized> {
    DISPATCHER.set(dispatcher).map_err(|_| AlreadyInitialized)
}

pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}

/// Used by the macros to skip formatting fields nobody will see
pub fn enabled(level: LogLevel) -> bool {
    DISPATCHER.get().is_some_and(|dispatcher| dispatcher.enabled(level))
}

/// Used by the macros
pub fn emit(level: LogLevel, code: Code, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
    if let Some(dispatcher) = DISPATCHER.get() {
        dispatcher.emit(level, code, message, fields);
    }
}

/// Attach what the pipeline found to the current file
pub fn record_file_stats(stats: FileStats) {
    if let (Some(dispatcher), Some(file)) = (DISPATCHER.get(), current_file()) {
        dispatcher.report.record_stats(&file.path, stats);
    }
}

pub fn run_summary() -> RunSummary {
    DISPATCHER
        .get()
        .map(|dispatcher| dispatcher.report.summary())
        .unwrap_or_default()
}

/// Cargo-style report of the run, unless disabled in the preferences
pub fn run_report() -> Option<String> {
    DISPATCHER
        .get()
        .filter(|dispatcher| dispatcher.cargo_style)
        .map(|dispatcher| dispatcher.report.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Logger::memory(LogLevel::Info), true)
    }

    #[test]
    fn test_events_are_filed_under_the_current_file() {
        let dispatcher = dispatcher();
        let path = PathBuf::from("src/Main.java");

        with_file_context(path.clone(), 7, || {
            dispatcher.emit(
                LogLevel::Warning,
                codes::lexical::NESTED_DISABLED_FLEX,
                "Nested disabled flex comment",
                &[("line", &3 as &dyn fmt::Display)],
            );
            dispatcher.emit(LogLevel::Info, codes::success::OUTPUT_WRITTEN, "written", &[]);
        });
        dispatcher.emit(LogLevel::Error, codes::batch::NO_FILES_FOUND, "nothing", &[]);

        let captured = dispatcher.logger().captured();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].file.as_deref(), Some(path.as_path()));
        assert_eq!(captured[0].field("line"), Some("3"));
        assert!(captured[2].file.is_none());

        let file = dispatcher.report().file(&path).unwrap();
        assert_eq!(file.diagnostics.len(), 1);
        assert_eq!(dispatcher.report().summary().warnings, 1);
        assert_eq!(dispatcher.report().summary().errors, 0);
    }

    #[test]
    fn test_diagnostics_bypass_the_level_filter() {
        let dispatcher = Dispatcher::new(Logger::memory(LogLevel::Error), false);
        assert!(dispatcher.enabled(LogLevel::Warning));
        assert!(!dispatcher.enabled(LogLevel::Info));

        with_file_context(PathBuf::from("A.java"), 0, || {
            dispatcher.emit(LogLevel::Warning, codes::lexical::NESTED_DISABLED_FLEX, "nested", &[]);
        });
        assert!(dispatcher.logger().captured().is_empty());
        assert_eq!(dispatcher.report().summary().warnings, 1);
    }

    #[test]
    fn test_nested_file_context_is_restored() {
        let outer = PathBuf::from("src/Outer.java");

        with_file_context(outer.clone(), 3, || {
            with_file_context(PathBuf::from("src/Inner.java"), 4, || {
                assert_eq!(current_file().map(|file| file.id), Some(4));
            });
            assert_eq!(current_file().map(|file| file.path), Some(outer.clone()));
        });

        assert!(current_file().is_none());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let message = "é".repeat(MAX_LOG_MESSAGE_LENGTH);
        let cut = truncate(&message);
        assert!(cut.len() <= MAX_LOG_MESSAGE_LENGTH);
        assert!(cut.chars().all(|c| c == 'é'));
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_uninitialized_calls_are_harmless() {
        if is_initialized() {
            return;
        }
        emit(LogLevel::Error, codes::system::INTERNAL_ERROR, "ignored", &[]);
        record_file_stats(FileStats::default());
        assert!(!enabled(LogLevel::Error));
        assert!(run_report().is_none());
        assert_eq!(run_summary(), RunSummary::default());
    }
}
