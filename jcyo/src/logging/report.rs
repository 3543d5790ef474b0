//! Per-file run report
//!
//! Every file processed under [`with_file_context`](super::with_file_context)
//! gets an entry holding what the pipeline did to it (tokens, directives,
//! disabled regions) and the warnings and errors logged while it was current.
//! The report is rendered in cargo style at the end of a run.

use super::events::{LogEvent, LogLevel};
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// What the pipeline found in one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub tokens: usize,
    pub directives: usize,
    pub disabled_regions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub file_id: usize,
    /// Unset when the file failed before the pipeline finished
    pub stats: Option<FileStats>,
    pub diagnostics: Vec<LogEvent>,
    /// Diagnostics dropped past the per-file limit
    pub dropped: usize,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|e| e.level == LogLevel::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// Totals over every file in the report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub errors: usize,
    pub warnings: usize,
    pub tokens: usize,
    pub directives: usize,
    pub disabled_regions: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn has_diagnostics(&self) -> bool {
        self.errors > 0 || self.warnings > 0
    }
}

pub struct RunReport {
    files: Mutex<BTreeMap<PathBuf, FileReport>>,
    started: Instant,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            started: Instant::now(),
        }
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileReport>> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_file(&self, path: &Path, file_id: usize) {
        self.files().entry(path.to_path_buf()).or_default().file_id = file_id;
    }

    pub fn record_stats(&self, path: &Path, stats: FileStats) {
        self.files().entry(path.to_path_buf()).or_default().stats = Some(stats);
    }

    /// Keep a warning or error under `path`; other levels are ignored
    pub fn record_event(&self, path: &Path, event: LogEvent) {
        if !event.is_diagnostic() {
            return;
        }
        let mut files = self.files();
        let report = files.entry(path.to_path_buf()).or_default();
        if report.diagnostics.len() < MAX_LOG_EVENTS_PER_FILE {
            report.diagnostics.push(event);
        } else {
            report.dropped += 1;
        }
    }

    pub fn file(&self, path: &Path) -> Option<FileReport> {
        self.files().get(path).cloned()
    }

    pub fn summary(&self) -> RunSummary {
        let files = self.files();
        let mut summary = RunSummary {
            files: files.len(),
            elapsed: self.started.elapsed(),
            ..RunSummary::default()
        };

        for report in files.values() {
            let errors = report.error_count();
            let warnings = report.warning_count();
            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            }
            summary.errors += errors;
            summary.warnings += warnings;

            if let Some(stats) = report.stats {
                summary.tokens += stats.tokens;
                summary.directives += stats.directives;
                summary.disabled_regions += stats.disabled_regions;
            }
        }
        summary
    }

    /// Cargo-style listing of every diagnostic followed by the totals line
    pub fn render(&self) -> String {
        let mut output = String::new();

        for (path, report) in self.files().iter() {
            for event in &report.diagnostics {
                let kind = if event.level == LogLevel::Error {
                    "error"
                } else {
                    "warning"
                };
                let _ = writeln!(output, "{}[{}]: {}", kind, event.code, event.message);
                let _ = writeln!(output, " --> {}", path.display());
                for (key, value) in &event.fields {
                    if key != "file" {
                        let _ = writeln!(output, "  = {}: {}", key, value);
                    }
                }
                if kind == "error" {
                    if let Some(help) = event.code.help() {
                        let _ = writeln!(output, "  = help: {}", help);
                    }
                }
                output.push('\n');
            }
            if report.dropped > 0 {
                let _ = writeln!(
                    output,
                    "note: {} more diagnostics for {} not shown\n",
                    report.dropped,
                    path.display()
                );
            }
        }

        let summary = self.summary();
        let _ = writeln!(
            output,
            "jcyo: {} {}, {} {}, {} disabled {}, {} {}, {} {}",
            summary.files,
            plural(summary.files, "file"),
            summary.directives,
            plural(summary.directives, "directive"),
            summary.disabled_regions,
            plural(summary.disabled_regions, "region"),
            summary.errors,
            plural(summary.errors, "error"),
            summary.warnings,
            plural(summary.warnings, "warning"),
        );
        output
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    fn stats(directives: usize, disabled_regions: usize) -> FileStats {
        FileStats {
            tokens: 100,
            directives,
            disabled_regions,
        }
    }

    #[test]
    fn test_summary_counts_files_and_regions() {
        let report = RunReport::new();
        let clean = Path::new("src/A.java");
        let noisy = Path::new("src/B.java");
        let broken = Path::new("src/C.java");

        report.record_file(clean, 0);
        report.record_stats(clean, stats(4, 2));
        report.record_file(noisy, 1);
        report.record_stats(noisy, stats(2, 1));
        report.record_event(noisy, LogEvent::warning(codes::lexical::NESTED_DISABLED_FLEX, "nested"));
        report.record_file(broken, 2);
        report.record_event(broken, LogEvent::error(codes::directive::PARSE_FAILURE, "bad"));

        let summary = report.summary();
        assert_eq!(summary.files, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.tokens, 200);
        assert_eq!(summary.directives, 6);
        assert_eq!(summary.disabled_regions, 3);
        assert!(report.file(broken).is_some_and(|file| file.stats.is_none()));
    }

    #[test]
    fn test_info_events_are_not_kept() {
        let report = RunReport::new();
        let path = Path::new("A.java");
        report.record_event(
            path,
            LogEvent::new(LogLevel::Info, codes::success::OUTPUT_WRITTEN, "written"),
        );
        assert!(report.file(path).is_none());
    }

    #[test]
    fn test_per_file_limit() {
        let report = RunReport::new();
        let path = Path::new("Noisy.java");
        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            report.record_event(path, LogEvent::warning(codes::lexical::NESTED_DISABLED_FLEX, "nested"));
        }

        let file = report.file(path).unwrap();
        assert_eq!(file.diagnostics.len(), MAX_LOG_EVENTS_PER_FILE);
        assert_eq!(file.dropped, 5);
        assert!(report.render().contains("note: 5 more diagnostics for Noisy.java"));
    }

    #[test]
    fn test_render() {
        let report = RunReport::new();
        let path = Path::new("src/Main.java");
        report.record_file(path, 0);
        report.record_event(
            path,
            LogEvent::error(codes::directive::PARSE_FAILURE, "Unknown directive iff")
                .with_field("file", "src/Main.java")
                .with_field("category", "Directive"),
        );

        let rendered = report.render();
        assert!(rendered.contains("error[E040]: Unknown directive iff\n --> src/Main.java\n"));
        assert!(rendered.contains("  = category: Directive\n"));
        assert!(rendered.contains("  = help: Fix the directive syntax"));
        assert!(!rendered.contains("= file:"));
        assert!(rendered.ends_with(
            "jcyo: 1 file, 0 directives, 0 disabled regions, 1 error, 0 warnings\n"
        ));
    }
}
