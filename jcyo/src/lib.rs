//! jcyo: conditional compilation embedded in Java comments
//!
//! Directives such as `//# if DEBUG` select which code stays live. Inactive
//! code is commented out with `//- ` or `/*- ... */`, so a processed file is
//! still valid Java and can be processed again with different variables.

#[macro_use]
pub mod logging;

pub mod batch;
pub mod config;
pub mod directive;
pub mod error;
pub mod expression;
pub mod file_processor;
pub mod lexical;
pub mod options;
pub mod pipeline;
pub mod processor;
pub mod tokens;
pub mod transform;
pub mod writer;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use error::{JcyoError, JcyoResult};
pub use expression::{Value, Variables};
pub use options::JcyoOptions;
pub use pipeline::{process_source, PipelineError, PipelineOutput, PipelineResult};
pub use processor::{ProcessOutcome, Processor, ProcessorError};
