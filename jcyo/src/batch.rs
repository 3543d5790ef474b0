//! Batch processing module
//!
//! Discovers source files below a base directory and runs each one through a
//! [`Processor`], sequentially or in parallel chunks. Processing is best
//! effort: a failing file is recorded and the batch moves on, unless
//! `fail_fast` is set.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::compile_time::file_processing::{SOURCE_EXTENSION, VARIANT_SEPARATOR};
use crate::config::runtime::BatchPreferences;
use crate::logging::{self, codes};
use crate::processor::{ProcessOutcome, Processor, ProcessorError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub fail_fast: bool,
    /// Directories never searched, e.g. a clean output directory below the base
    pub excluded_directories: Vec<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_preferences(&BatchPreferences::default())
    }
}

impl BatchConfig {
    pub fn from_preferences(prefs: &BatchPreferences) -> Self {
        Self {
            max_threads: prefs.max_threads.clamp(1, MAX_WORKER_THREADS),
            recursive: prefs.recursive,
            fail_fast: prefs.fail_fast,
            excluded_directories: Vec::new(),
        }
    }

    pub fn sequential(mut self) -> Self {
        self.max_threads = 1;
        self
    }

    pub fn exclude_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.excluded_directories.push(directory.into());
        self
    }
}

/// Batch processing results
#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, ProcessOutcome)>,
    pub failed_files: Vec<(PathBuf, ProcessorError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty()
    }

    /// Files whose editable or clean form was actually rewritten
    pub fn written_count(&self) -> usize {
        self.successful_files
            .iter()
            .filter(|(_, outcome)| outcome.editable_written || outcome.clean_written)
            .count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, outcome: ProcessOutcome) {
        self.successful_files.push((file_path, outcome));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: ProcessorError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} written, {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.written_count(),
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No .java files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread failed: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> logging::Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            BatchError::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            BatchError::IoError { .. } => codes::file_processing::IO_ERROR,
            BatchError::ThreadError { .. } => codes::batch::THREAD_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Discover the source files below `dir_path`, sorted
pub fn discover_source_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        crate::log_error!(codes::batch::DIRECTORY_NOT_FOUND, "Base directory not found",
            "directory" => dir_path.display()
        );
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(dir_path)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry.path(), config));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BatchError::IoError {
            error: e.to_string(),
        })?;

        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());

            if files.len() > MAX_FILES_PER_BATCH {
                crate::log_error!(codes::batch::TOO_MANY_FILES, "Reached maximum file limit",
                    "limit" => MAX_FILES_PER_BATCH
                );
                return Err(BatchError::TooManyFiles {
                    count: files.len(),
                    max: MAX_FILES_PER_BATCH,
                });
            }
        }
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    files.sort();

    crate::log_info!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn is_excluded(path: &Path, config: &BatchConfig) -> bool {
    config
        .excluded_directories
        .iter()
        .any(|excluded| path.starts_with(excluded))
}

/// `*.java` without the variant separator in its name
pub fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == SOURCE_EXTENSION);

    has_extension && !name.contains(VARIANT_SEPARATOR)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn process_one(
    processor: &Processor,
    file_path: &Path,
    file_id: usize,
    results: &mut BatchResults,
) -> bool {
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        match processor.process(file_path) {
            Ok(outcome) => {
                crate::log_success!(
                    codes::success::FILE_PROCESSING_SUCCESS,
                    "File processed successfully",
                    "file" => file_path.display(),
                    "file_id" => file_id
                );
                results.add_success(file_path.to_path_buf(), outcome);
                true
            }
            Err(error) => {
                crate::log_error!(codes::batch::FILE_FAILED, "File processing failed",
                    "file" => file_path.display(),
                    "file_id" => file_id,
                    "cause" => error.error_code()
                );
                results.add_failure(file_path.to_path_buf(), error);
                false
            }
        }
    })
}

/// Process `files` one after another
pub fn process_files_sequential(
    processor: &Processor,
    files: &[PathBuf],
    config: &BatchConfig,
) -> BatchResults {
    let mut results = BatchResults::new();

    for (file_id, file_path) in files.iter().enumerate() {
        let succeeded = process_one(processor, file_path, file_id, &mut results);

        if !succeeded && config.fail_fast {
            crate::log_info!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    results
}

/// Process `files` in chunks, each chunk split across worker threads
pub fn process_files_parallel(
    processor: &Processor,
    files: &[PathBuf],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let max_threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);
    let chunk_size = calculate_chunk_size(files.len(), max_threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => max_threads
    );

    let mut results = BatchResults::new();

    for (chunk_index, chunk) in files.chunks(chunk_size).enumerate() {
        let chunk_results = process_chunk_parallel(processor, chunk, chunk_index * chunk_size, max_threads)?;
        results.merge(chunk_results);

        if config.fail_fast && results.has_failures() {
            crate::log_info!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    results.sort();
    Ok(results)
}

fn process_chunk_parallel(
    processor: &Processor,
    files: &[PathBuf],
    first_file_id: usize,
    max_threads: usize,
) -> Result<BatchResults, BatchError> {
    let results = Mutex::new(BatchResults::new());
    let files_per_thread = files.len().div_ceil(max_threads).max(1);

    let joined: Vec<thread::Result<()>> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(files_per_thread)
            .enumerate()
            .map(|(thread_id, thread_files)| {
                let results = &results;
                scope.spawn(move || {
                    let mut local = BatchResults::new();
                    for (offset, file_path) in thread_files.iter().enumerate() {
                        let file_id = first_file_id + thread_id * files_per_thread + offset;
                        process_one(processor, file_path, file_id, &mut local);
                    }
                    results
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .merge(local);
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join()).collect()
    });

    if joined.iter().any(|outcome| outcome.is_err()) {
        crate::log_error!(codes::batch::THREAD_FAILURE, "Worker thread panicked");
        return Err(BatchError::ThreadError {
            message: "Thread panicked during processing".to_string(),
        });
    }

    Ok(results
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner()))
}

/// Files per chunk: an even share per thread, between 1 and 50
fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 50;

    file_count
        .div_ceil(max_threads.max(1))
        .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Process explicit files, sequentially or in parallel per `config`
pub fn process_files(
    processor: &Processor,
    files: &[PathBuf],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    crate::log_info!("Starting batch processing",
        "files" => files.len(),
        "max_threads" => config.max_threads
    );

    let mut results = if config.max_threads <= 1 || files.len() <= 1 {
        process_files_sequential(processor, files, config)
    } else {
        process_files_parallel(processor, files, config)?
    };
    results.files_discovered = files.len();
    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "written" => results.written_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Discover and process every source file under the processor's base directory
pub fn process_directory(
    processor: &Processor,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let files = discover_source_files(processor.base_directory(), config)?;
    process_files(processor, &files, config)
}
