use crate::error::JcyoError;
use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};

/// Pipeline processing errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("{0}")]
    Transform(#[from] JcyoError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::Transform(error) => error.error_code(),
            PipelineError::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn requires_halt(&self) -> bool {
        self.error_code().requires_halt()
    }
}
