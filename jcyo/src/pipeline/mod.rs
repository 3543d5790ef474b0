//! Per-file pipeline
//!
//! ```text
//! Lexer -> GeneratedCodeRemover -> DirectiveApplier -> UnusedImportDisabler -> TokenWriter
//!                                                              |
//!                                                              +-> copy -> Cleaner
//! ```
//!
//! The writer renders the editable form while a tee keeps every token of the
//! last stage, which the cleaner turns into the clean form afterwards.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;

use crate::error::JcyoResult;
use crate::expression::Variables;
use crate::lexical::Lexer;
use crate::logging::{self, FileStats};
use crate::options::JcyoOptions;
use crate::tokens::{concat_raw, Token, TokenBuffer};
use crate::transform::{Cleaner, DirectiveApplier, GeneratedCodeRemover, UnusedImportDisabler};
use crate::writer::TokenWriter;
use std::path::Path;
use std::time::Instant;

/// Run the full pipeline over in-memory source text
pub fn process_source(
    source: &str,
    options: &JcyoOptions,
    variables: &Variables,
) -> JcyoResult<PipelineOutput> {
    run(source, options, variables).map(|(output, _)| output)
}

fn run(
    source: &str,
    options: &JcyoOptions,
    variables: &Variables,
) -> JcyoResult<(PipelineOutput, FileStats)> {
    let markers = options.markers();

    let lexer = Lexer::new(source, options);
    let remover = GeneratedCodeRemover::new(lexer, &markers);
    let applier = DirectiveApplier::new(remover, variables);
    let mut disabler = UnusedImportDisabler::new(applier);

    let mut copy = TokenBuffer::new();
    let mut writer = TokenWriter::new(String::new(), markers);
    writer.write_stream(copy.copying(&mut disabler))?;

    let stats = file_stats(&copy);
    let editable = writer.into_inner();
    let clean = concat_raw(Cleaner::new(copy))?;

    Ok((PipelineOutput::new(editable, clean), stats))
}

fn file_stats(tokens: &TokenBuffer) -> FileStats {
    let mut stats = FileStats {
        tokens: tokens.len(),
        ..FileStats::default()
    };
    for token in tokens.iter() {
        match token {
            Token::DirectiveStart { .. } => stats.directives += 1,
            Token::DisabledRegionStart { .. } => stats.disabled_regions += 1,
            _ => {}
        }
    }
    stats
}

/// Read a file and run it through the pipeline (file -> tokens -> editable + clean)
pub fn process_file(
    file_path: &Path,
    options: &JcyoOptions,
    variables: &Variables,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let file_id = logging::current_file()
        .filter(|file| file.path == file_path)
        .map_or(0, |file| file.id);

    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        crate::log_info!("Starting jcyo pipeline", "file" => file_path.display());

        let file_result = crate::file_processor::process_file(file_path)?;

        let (output, stats) = match run(&file_result.source, options, variables) {
            Ok(done) => done,
            Err(error) => {
                crate::log_error!(error.error_code(), &error.to_string(),
                    "file" => file_path.display(),
                    "category" => error.error_code().category().as_str()
                );
                return Err(error.into());
            }
        };

        let result = PipelineResult::new(
            output,
            file_result.metadata,
            stats,
            start_time.elapsed(),
        );
        result.log_success();

        Ok(result)
    })
}
