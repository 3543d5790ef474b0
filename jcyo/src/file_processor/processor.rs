//! Source file reading with size, extension and encoding validation

use crate::config::constants::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, SOURCE_EXTENSION,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_performance, log_success};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .java, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        self.error_code().requires_halt()
    }

    pub fn severity(&self) -> &'static str {
        self.error_code().severity().as_str()
    }

    pub fn category(&self) -> &'static str {
        self.error_code().category().as_str()
    }

    /// Map an I/O failure on `path` to the matching variant and log it
    fn from_io(error: io::Error, path: &Path, action: &str) -> Self {
        let path_str = path.display().to_string();
        let err = match error.kind() {
            io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path_str.clone(),
            },
            io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path_str.clone(),
            },
            io::ErrorKind::InvalidData => FileProcessorError::InvalidEncoding {
                path: path_str.clone(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", action, path_str, error),
            },
        };
        log_error!(err.error_code(), &format!("Failed to {}", action),
            "path" => path_str,
            "io_error" => error);
        err
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    /// Whether the file has the `.java` extension
    pub is_source_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        human_readable_size(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// File contents with metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

/// Reads one source file after validating it against the compile-time limits
#[derive(Debug, Clone)]
pub struct FileProcessor {
    /// Reject files without the `.java` extension
    pub require_source_extension: bool,
    /// Log size and timing of every file read
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_source_extension: false,
            enable_performance_logging: false,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_source_extension: prefs.require_source_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_source_extension_required(mut self, required: bool) -> Self {
        self.require_source_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Read a file and return its contents with metadata
    ///
    /// Empty files are valid input and produce an empty source.
    pub fn process_file(&self, file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();

        log_debug!("Starting file processing", "file" => file_path.display());

        let path = self.validate_path(file_path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata)?;

        let source = fs::read_to_string(&path)
            .map_err(|e| FileProcessorError::from_io(e, &path, "read file"))?;
        metadata.line_count = source.lines().count();

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result);
        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult) {
        let file = result.metadata.path.display();
        if self.enable_performance_logging {
            log_performance!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read with performance metrics",
                duration = result.processing_duration,
                "file" => file,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => file,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count
            );
        }
    }

    /// Check existence and resolve the canonical path
    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.display().to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path.display());
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path.display());
            return Err(error);
        }

        file_path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(e, file_path, "resolve path"))
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata =
            fs::metadata(path).map_err(|e| FileProcessorError::from_io(e, path, "read metadata"))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_source_file = extension.as_deref() == Some(SOURCE_EXTENSION);

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_source_file,
            modified: metadata.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size_human" => file_metadata.human_readable_size(),
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_large_file" => file_metadata.is_large_file());

        Ok(file_metadata)
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum size limit",
                "file" => metadata.path.display(),
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable_size(MAX_FILE_SIZE));
            return Err(error);
        }

        if self.require_source_extension && !metadata.is_source_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .java extension",
                "file" => metadata.path.display(),
                "extension" => metadata.extension.as_deref().unwrap_or("none"));
            return Err(error);
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Main.java");
        let content = "class Main {\n}\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();

        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_source_file);
        assert_eq!(result.char_count(), content.chars().count());
    }

    #[test]
    fn test_empty_file_is_valid() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Empty.java");
        fs::write(&file_path, "").unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert!(result.source.is_empty());
        assert_eq!(result.metadata.line_count, 0);
    }

    #[test]
    fn test_file_not_found() {
        let result = FileProcessor::new().process_file(Path::new("Nonexistent.java"));
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
        let result = FileProcessor::new().process_file(Path::new(""));
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_file_size_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Large.java");
        let file = fs::File::create(&file_path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::FileTooLarge { size, max_size })
                if size == MAX_FILE_SIZE + 1 && max_size == MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "text").unwrap();

        let lenient = FileProcessor::new();
        assert!(lenient.process_file(&file_path).is_ok());

        let strict = FileProcessor::new().with_source_extension_required(true);
        assert_matches!(
            strict.process_file(&file_path),
            Err(FileProcessorError::InvalidExtension { extension: Some(ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Binary.java");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(result, Err(FileProcessorError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_performance_logging_does_not_change_result() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Main.java");
        fs::write(&file_path, "class Main {}").unwrap();

        let result = FileProcessor::new()
            .with_performance_logging(true)
            .process_file(&file_path)
            .unwrap();
        assert_eq!(result.source, "class Main {}");
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(512), "512 B");
        assert_eq!(human_readable_size(2048), "2.00 KB");
        assert_eq!(human_readable_size(MAX_FILE_SIZE), "10.00 MB");
    }

    #[test]
    fn test_error_classification() {
        let error = FileProcessorError::FileNotFound {
            path: "Main.java".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert_eq!(error.severity(), "High");
        assert!(!error.requires_halt());
    }

    #[test]
    fn test_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_source_extension: true,
            enable_performance_logging: false,
        };
        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_source_extension);
        assert!(!processor.enable_performance_logging);
    }
}
