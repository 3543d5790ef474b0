//! Where log events end up

use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::sync::{Mutex, MutexGuard};

pub enum Sink {
    /// Human-readable lines on stderr
    Console,
    /// One JSON object per line on stderr
    Json,
    /// Kept in memory for inspection
    Memory(Mutex<Vec<LogEvent>>),
    Off,
}

/// Level filter in front of a [`Sink`]
pub struct Logger {
    min_level: LogLevel,
    sink: Sink,
    with_file: bool,
}

impl Logger {
    pub fn new(min_level: LogLevel, sink: Sink) -> Self {
        Self {
            min_level,
            sink,
            with_file: true,
        }
    }

    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let sink = if !preferences.enable_console_logging {
            Sink::Off
        } else if preferences.use_structured_logging {
            Sink::Json
        } else {
            Sink::Console
        };
        Self {
            min_level: preferences.min_log_level,
            sink,
            with_file: preferences.include_file_context,
        }
    }

    pub fn memory(min_level: LogLevel) -> Self {
        Self::new(min_level, Sink::Memory(Mutex::new(Vec::new())))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.min_level && !matches!(self.sink, Sink::Off)
    }

    pub fn log(&self, event: &LogEvent) {
        if !self.enabled(event.level) {
            return;
        }
        match &self.sink {
            Sink::Console => eprintln!("{}", event.format(self.with_file)),
            Sink::Json => match event.format_json(self.with_file) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", event.format(self.with_file)),
            },
            Sink::Memory(events) => lock(events).push(event.clone()),
            Sink::Off => {}
        }
    }

    /// Events kept by a memory sink, oldest first
    pub fn captured(&self) -> Vec<LogEvent> {
        match &self.sink {
            Sink::Memory(events) => lock(events).clone(),
            _ => Vec::new(),
        }
    }
}

fn lock(events: &Mutex<Vec<LogEvent>>) -> MutexGuard<'_, Vec<LogEvent>> {
    events
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
