//! Core error taxonomy shared by every token pipeline stage
//!
//! Read, parse and evaluation failures are fatal for the current file and unwind
//! out of the whole pipeline. Callers distinguish syntax problems (`Parse`) from
//! semantic ones (`Evaluation`) by variant.

use crate::logging::codes::{self, Code, Severity};

/// Result alias used throughout the token pipeline
pub type JcyoResult<T> = Result<T, JcyoError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JcyoError {
    #[error("Failed to read source: {message}")]
    Read { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Evaluation error: {message}")]
    Evaluation { message: String },

    #[error("Token stream misuse: {message}")]
    Stream { message: String },

    #[error("Failed to render output: {message}")]
    Output { message: String },
}

impl JcyoError {
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Get the logging code for this error
    pub fn error_code(&self) -> Code {
        match self {
            JcyoError::Read { .. } => codes::file_processing::IO_ERROR,
            JcyoError::Parse { .. } => codes::directive::PARSE_FAILURE,
            JcyoError::Evaluation { .. } => codes::expression::EVALUATION_FAILURE,
            JcyoError::Stream { .. } => codes::transform::STREAM_FAILURE,
            JcyoError::Output { .. } => codes::output::RENDER_FAILURE,
        }
    }

    pub fn severity(&self) -> Severity {
        self.error_code().severity()
    }

    pub fn category(&self) -> &'static str {
        self.error_code().category().as_str()
    }

    pub fn requires_halt(&self) -> bool {
        self.error_code().requires_halt()
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, JcyoError::Parse { .. })
    }

    pub fn is_evaluation_failure(&self) -> bool {
        matches!(self, JcyoError::Evaluation { .. })
    }
}

impl From<std::fmt::Error> for JcyoError {
    fn from(_: std::fmt::Error) -> Self {
        JcyoError::output("formatter reported an error")
    }
}
