//! Diagnostic codes
//!
//! A [`Code`] carries its own classification, so an error only has to name
//! its code for the report to know the category, severity and what to do
//! about it. Codes are grouped by the stage that raises them:
//!
//! | prefix | meaning                                  |
//! |--------|------------------------------------------|
//! | `ERR`  | internal failure, always halts           |
//! | `E`    | error in one file or in the run setup    |
//! | `W`    | warning, processing continues            |
//! | `I`    | progress and success notes               |

use std::fmt;

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    System,
    FileProcessing,
    Lexical,
    Directive,
    Expression,
    Transform,
    Output,
    Batch,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "System",
            Category::FileProcessing => "FileProcessing",
            Category::Lexical => "Lexical",
            Category::Directive => "Directive",
            Category::Expression => "Expression",
            Category::Transform => "Transform",
            Category::Output => "Output",
            Category::Batch => "Batch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

// ============================================================================
// CODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    id: &'static str,
    category: Category,
    severity: Severity,
    halts: bool,
    help: Option<&'static str>,
}

impl Code {
    /// A failure confined to the file being processed
    const fn error(id: &'static str, category: Category, severity: Severity, help: &'static str) -> Self {
        Self {
            id,
            category,
            severity,
            halts: false,
            help: Some(help),
        }
    }

    /// A failure that makes the rest of the run pointless
    const fn halting(id: &'static str, category: Category, help: &'static str) -> Self {
        Self {
            id,
            category,
            severity: Severity::Critical,
            halts: true,
            help: Some(help),
        }
    }

    const fn note(id: &'static str, category: Category) -> Self {
        Self {
            id,
            category,
            severity: Severity::Low,
            halts: false,
            help: None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn requires_halt(&self) -> bool {
        self.halts
    }

    /// What the user can do about it
    pub fn help(&self) -> Option<&'static str> {
        self.help
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

// ============================================================================
// CODES
// ============================================================================

pub mod system {
    use super::{Category, Code};

    pub const INTERNAL_ERROR: Code = Code::halting(
        "ERR001",
        Category::System,
        "File a bug report with the input that triggered it",
    );
}

pub mod file_processing {
    use super::{Category, Code, Severity};

    pub const FILE_NOT_FOUND: Code = Code::error(
        "E005",
        Category::FileProcessing,
        Severity::High,
        "Check the file path and that the file exists",
    );
    pub const INVALID_EXTENSION: Code = Code::error(
        "E006",
        Category::FileProcessing,
        Severity::Medium,
        "Rename the file to .java or unset JCYO_REQUIRE_SOURCE_EXTENSION",
    );
    pub const FILE_TOO_LARGE: Code = Code::error(
        "E007",
        Category::FileProcessing,
        Severity::High,
        "Split the file; sources above 10MB are not processed",
    );
    pub const PERMISSION_DENIED: Code = Code::error(
        "E008",
        Category::FileProcessing,
        Severity::High,
        "Check file permissions",
    );
    pub const INVALID_ENCODING: Code = Code::error(
        "E009",
        Category::FileProcessing,
        Severity::High,
        "Convert the file to UTF-8",
    );
    pub const IO_ERROR: Code = Code::error(
        "E010",
        Category::FileProcessing,
        Severity::High,
        "Check that the file is readable",
    );
    pub const INVALID_PATH: Code = Code::error(
        "E011",
        Category::FileProcessing,
        Severity::Medium,
        "Check that the path exists and is well formed",
    );
}

pub mod lexical {
    use super::{Category, Code};

    /// `/*-` inside a disabled flex comment; kept as plain text
    pub const NESTED_DISABLED_FLEX: Code = Code::note("W020", Category::Lexical);
}

pub mod directive {
    use super::{Category, Code, Severity};

    pub const PARSE_FAILURE: Code = Code::error(
        "E040",
        Category::Directive,
        Severity::High,
        "Fix the directive syntax at the reported location",
    );
}

pub mod expression {
    use super::{Category, Code, Severity};

    pub const EVALUATION_FAILURE: Code = Code::error(
        "E060",
        Category::Expression,
        Severity::High,
        "Check the variable values and operand types of the condition",
    );
}

pub mod transform {
    use super::{Category, Code};

    pub const STREAM_FAILURE: Code = Code::halting(
        "E070",
        Category::Transform,
        "File a bug report with the input that triggered it",
    );
}

pub mod output {
    use super::{Category, Code, Severity};

    pub const RENDER_FAILURE: Code = Code::error(
        "E080",
        Category::Output,
        Severity::High,
        "File a bug report with the input that triggered it",
    );
    pub const WRITE_FAILURE: Code = Code::error(
        "E081",
        Category::Output,
        Severity::High,
        "Check permissions of the destination directory",
    );
    pub const OUTSIDE_BASE_DIRECTORY: Code = Code::error(
        "E082",
        Category::Output,
        Severity::Medium,
        "Pass files located under the base directory",
    );
    pub const MISSING_CLEAN_OUTPUT: Code = Code::halting(
        "E083",
        Category::Output,
        "Pass --clean-output or --update-input",
    );
}

pub mod batch {
    use super::{Category, Code, Severity};

    pub const DIRECTORY_NOT_FOUND: Code =
        Code::halting("E100", Category::Batch, "Check the base directory path");
    pub const NO_FILES_FOUND: Code = Code::error(
        "E101",
        Category::Batch,
        Severity::Low,
        "Check the base directory and --no-recursive",
    );
    pub const TOO_MANY_FILES: Code =
        Code::halting("E102", Category::Batch, "Process a smaller directory tree");
    pub const THREAD_FAILURE: Code = Code::halting("E103", Category::Batch, "File a bug report");
    pub const FILE_FAILED: Code = Code::error(
        "E104",
        Category::Batch,
        Severity::Medium,
        "See the file's own error for details",
    );
}

pub mod success {
    use super::{Category, Code};

    pub const LOGGING_READY: Code = Code::note("I004", Category::System);
    pub const FILE_PROCESSING_SUCCESS: Code = Code::note("I006", Category::FileProcessing);
    pub const PIPELINE_COMPLETE: Code = Code::note("I010", Category::Transform);
    pub const OUTPUT_WRITTEN: Code = Code::note("I011", Category::Output);
    pub const OUTPUT_UNCHANGED: Code = Code::note("I012", Category::Output);
    pub const BATCH_COMPLETE: Code = Code::note("I020", Category::Batch);
}

/// Placeholder code for events logged without one
pub(crate) const UNCODED: Code = Code::note("-", Category::System);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_carry_their_classification() {
        assert_eq!(directive::PARSE_FAILURE.as_str(), "E040");
        assert_eq!(directive::PARSE_FAILURE.category().as_str(), "Directive");
        assert_eq!(directive::PARSE_FAILURE.severity(), Severity::High);
        assert!(directive::PARSE_FAILURE.help().is_some());

        assert_eq!(lexical::NESTED_DISABLED_FLEX.category(), Category::Lexical);
        assert!(lexical::NESTED_DISABLED_FLEX.help().is_none());
    }

    #[test]
    fn test_halting_codes() {
        assert!(output::MISSING_CLEAN_OUTPUT.requires_halt());
        assert!(system::INTERNAL_ERROR.requires_halt());
        assert_eq!(batch::THREAD_FAILURE.severity(), Severity::Critical);
        assert!(!directive::PARSE_FAILURE.requires_halt());
        assert!(!batch::FILE_FAILED.requires_halt());
    }

    #[test]
    fn test_error_ids_are_unique() {
        let all = [
            system::INTERNAL_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            lexical::NESTED_DISABLED_FLEX,
            directive::PARSE_FAILURE,
            expression::EVALUATION_FAILURE,
            transform::STREAM_FAILURE,
            output::RENDER_FAILURE,
            output::WRITE_FAILURE,
            output::OUTSIDE_BASE_DIRECTORY,
            output::MISSING_CLEAN_OUTPUT,
            batch::DIRECTORY_NOT_FOUND,
            batch::NO_FILES_FOUND,
            batch::TOO_MANY_FILES,
            batch::THREAD_FAILURE,
            batch::FILE_FAILED,
        ];
        let ids: std::collections::HashSet<_> = all.iter().map(Code::as_str).collect();
        assert_eq!(ids.len(), all.len());
    }
}
