//! Reading and validating a single source file

mod processor;

use crate::config::runtime::FileProcessorPreferences;
use std::path::Path;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Read `file_path` with the `JCYO_*` runtime preferences
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::from_preferences(&FileProcessorPreferences::default()).process_file(file_path)
}
