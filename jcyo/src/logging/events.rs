//! A single log record and its console and JSON renderings

use super::codes::Code;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use crate::config::runtime::LogLevel;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Source file being processed when the event was logged
    pub file: Option<PathBuf>,
    /// `key => value` pairs in the order they were given
    pub fields: Vec<(String, String)>,
}

impl LogEvent {
    pub fn new(level: LogLevel, code: Code, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.into(),
            file: None,
            fields: Vec::new(),
        }
    }

    pub fn error(code: Code, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(code: Code, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, code, message)
    }

    pub fn with_field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_diagnostic(&self) -> bool {
        self.level <= LogLevel::Warning
    }

    /// One console line: `[WARN] W020 src/A.java: message (key=value, ...)`
    pub fn format(&self, with_file: bool) -> String {
        let mut line = format!("[{}] {}", self.level.as_str(), self.code);
        if let (true, Some(file)) = (with_file, &self.file) {
            line.push_str(&format!(" {}", file.display()));
        }
        line.push_str(&format!(": {}", self.message));

        let fields: Vec<String> = self
            .fields
            .iter()
            .filter(|(key, _)| !(key == "file" && self.file.is_some()))
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if !fields.is_empty() {
            line.push_str(&format!(" ({})", fields.join(", ")));
        }
        line
    }

    pub fn format_json(&self, with_file: bool) -> Result<String, serde_json::Error> {
        let record = JsonRecord {
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level: self.level.as_str(),
            code: self.code.as_str(),
            category: self.code.category().as_str(),
            message: &self.message,
            file: self
                .file
                .as_ref()
                .filter(|_| with_file)
                .map(|file| file.display().to_string()),
            help: (self.level == LogLevel::Error)
                .then(|| self.code.help())
                .flatten(),
            fields: self
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::from(value.as_str())))
                .collect(),
        };
        serde_json::to_string(&record)
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: &'static str,
    code: &'static str,
    category: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static str>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    fields: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_console_format() {
        let event = LogEvent::error(codes::directive::PARSE_FAILURE, "Unknown directive iff")
            .in_file("src/Main.java")
            .with_field("file", "src/Main.java")
            .with_field("line", 3);

        assert_eq!(
            event.format(true),
            "[ERROR] E040 src/Main.java: Unknown directive iff (line=3)"
        );
        assert_eq!(
            event.format(false),
            "[ERROR] E040: Unknown directive iff (line=3)"
        );
    }

    #[test]
    fn test_fields_keep_their_order() {
        let event = LogEvent::new(LogLevel::Info, codes::success::PIPELINE_COMPLETE, "done")
            .with_field("tokens", 157)
            .with_field("directives", 4);
        assert_eq!(event.field("directives"), Some("4"));
        assert_eq!(event.fields[0].0, "tokens");
        assert!(!event.is_diagnostic());
    }

    #[test]
    fn test_json_format() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .in_file("Test.java")
            .with_field("action", "read");

        let json: serde_json::Value =
            serde_json::from_str(&event.format_json(true).unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E008");
        assert_eq!(json["category"], "FileProcessing");
        assert_eq!(json["file"], "Test.java");
        assert_eq!(json["fields"]["action"], "read");
        assert_eq!(json["help"], "Check file permissions");
        assert!(json["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));

        let warning = LogEvent::warning(codes::lexical::NESTED_DISABLED_FLEX, "nested");
        let json: serde_json::Value =
            serde_json::from_str(&warning.format_json(true).unwrap()).unwrap();
        assert!(json.get("file").is_none());
        assert!(json.get("help").is_none());
        assert!(json.get("fields").is_none());
    }
}
