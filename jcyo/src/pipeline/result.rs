use super::output::PipelineOutput;
use crate::file_processor::FileMetadata;
use crate::logging::{self, FileStats};
use std::time::Duration;

/// Pipeline output for a file read from disk, with its metadata and timing
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub output: PipelineOutput,
    pub file_metadata: FileMetadata,
    /// Counts over the tokens of the final transformation stage
    pub stats: FileStats,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        output: PipelineOutput,
        file_metadata: FileMetadata,
        stats: FileStats,
        processing_duration: Duration,
    ) -> Self {
        Self {
            output,
            file_metadata,
            stats,
            processing_duration,
        }
    }

    /// Log completion and file the stats under the current file's report entry
    pub fn log_success(&self) {
        logging::record_file_stats(self.stats);
        crate::log_success!(
            logging::codes::success::PIPELINE_COMPLETE,
            "Editable and clean forms produced",
            "file" => self.file_metadata.path.display(),
            "tokens" => self.stats.tokens,
            "directives" => self.stats.directives,
            "disabled_regions" => self.stats.disabled_regions,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
