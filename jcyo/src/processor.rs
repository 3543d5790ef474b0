//! File orchestrator
//!
//! Runs one file through the pipeline and writes its outputs: the editable
//! form back over the input when `update_input` is set, and the clean form
//! under the clean output directory at the input's path relative to the base
//! directory. A write is skipped when the SHA-256 of the new text equals that
//! of the file already on disk. Outputs are staged in a temp file next to the
//! target and persisted over it, so a failed run never leaves a partial file.

use crate::expression::Variables;
use crate::logging::{codes, Code};
use crate::options::JcyoOptions;
use crate::pipeline::{self, PipelineError, PipelineResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessorError {
    #[error("{} is outside the base directory {}", path.display(), base.display())]
    OutsideBaseDirectory { path: PathBuf, base: PathBuf },

    #[error("No clean output directory configured and input files are not updated in place")]
    MissingCleanOutput,

    #[error("Invalid path {}: {message}", path.display())]
    InvalidPath { path: PathBuf, message: String },

    #[error("{}: {source}", path.display())]
    Pipeline {
        path: PathBuf,
        #[source]
        source: PipelineError,
    },

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl ProcessorError {
    pub fn error_code(&self) -> Code {
        match self {
            ProcessorError::OutsideBaseDirectory { .. } => codes::output::OUTSIDE_BASE_DIRECTORY,
            ProcessorError::MissingCleanOutput => codes::output::MISSING_CLEAN_OUTPUT,
            ProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            ProcessorError::Pipeline { source, .. } => source.error_code(),
            ProcessorError::Write { .. } => codes::output::WRITE_FAILURE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        self.error_code().requires_halt()
    }
}

/// What happened to one file
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub result: PipelineResult,
    /// The editable form replaced the input
    pub editable_written: bool,
    pub clean_path: Option<PathBuf>,
    /// The clean form was (re)written at `clean_path`
    pub clean_written: bool,
}

#[derive(Debug, Clone)]
pub struct Processor {
    options: JcyoOptions,
    variables: Variables,
    base_directory: PathBuf,
    clean_output_directory: Option<PathBuf>,
}

impl Processor {
    pub fn new(options: JcyoOptions, variables: Variables, base_directory: impl Into<PathBuf>) -> Self {
        Self {
            options,
            variables,
            base_directory: base_directory.into(),
            clean_output_directory: None,
        }
    }

    pub fn with_clean_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.clean_output_directory = Some(directory.into());
        self
    }

    pub fn options(&self) -> &JcyoOptions {
        &self.options
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn clean_output_directory(&self) -> Option<&Path> {
        self.clean_output_directory.as_deref()
    }

    /// Check that the configuration can produce at least one output
    pub fn validate(&self) -> Result<(), ProcessorError> {
        if !self.options.update_input && self.clean_output_directory.is_none() {
            return Err(ProcessorError::MissingCleanOutput);
        }
        Ok(())
    }

    /// Process one file and write its outputs
    pub fn process(&self, path: &Path) -> Result<ProcessOutcome, ProcessorError> {
        self.validate()?;
        let relative = self.relative_path(path)?;

        let result = pipeline::process_file(path, &self.options, &self.variables).map_err(
            |source| ProcessorError::Pipeline {
                path: path.to_path_buf(),
                source,
            },
        )?;

        let editable_written = if self.options.update_input {
            write_if_changed(path, &result.output.editable)?
        } else {
            false
        };

        let clean_path = self
            .clean_output_directory
            .as_ref()
            .map(|directory| directory.join(&relative));
        let clean_written = match &clean_path {
            Some(target) => write_if_changed(target, &result.output.clean)?,
            None => false,
        };

        Ok(ProcessOutcome {
            result,
            editable_written,
            clean_path,
            clean_written,
        })
    }

    /// Path of `path` below the base directory
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf, ProcessorError> {
        let base = canonicalize(&self.base_directory)?;
        let input = canonicalize(path)?;

        match input.strip_prefix(&base) {
            Ok(relative) if !relative.as_os_str().is_empty() => Ok(relative.to_path_buf()),
            _ => {
                crate::log_error!(codes::output::OUTSIDE_BASE_DIRECTORY, "Input rejected",
                    "path" => path.display(),
                    "base" => self.base_directory.display()
                );
                Err(ProcessorError::OutsideBaseDirectory {
                    path: path.to_path_buf(),
                    base: self.base_directory.clone(),
                })
            }
        }
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ProcessorError> {
    fs::canonicalize(path).map_err(|e| ProcessorError::InvalidPath {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Hex SHA-256 of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Write `contents` to `target` unless it already holds exactly that text
fn write_if_changed(target: &Path, contents: &str) -> Result<bool, ProcessorError> {
    if let Ok(existing) = fs::read(target) {
        if content_hash(&existing) == content_hash(contents.as_bytes()) {
            crate::log_success!(codes::success::OUTPUT_UNCHANGED, "Output unchanged",
                "path" => target.display()
            );
            return Ok(false);
        }
    }

    write_atomically(target, contents).map_err(|e| {
        crate::log_error!(codes::output::WRITE_FAILURE, "Failed to write output",
            "path" => target.display(),
            "error" => &e
        );
        ProcessorError::Write {
            path: target.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    crate::log_success!(codes::success::OUTPUT_WRITTEN, "Output written",
        "path" => target.display(),
        "bytes" => contents.len()
    );
    Ok(true)
}

fn write_atomically(target: &Path, contents: &str) -> io::Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(contents.as_bytes())?;
    staged.flush()?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}
