use clap::Parser;
use jcyo::batch::{self, BatchConfig, BatchResults};
use jcyo::config::RuntimeConfig;
use jcyo::expression::{Variables, VariablesError};
use jcyo::logging;
use jcyo::options::JcyoOptions;
use jcyo::processor::Processor;
use std::path::PathBuf;

/// Comment-embedded conditional compilation for Java sources
#[derive(Parser, Debug)]
#[command(name = "jcyo", version)]
struct Cli {
    /// Base directory; inputs must lie below it and are discovered here by default
    base_dir: PathBuf,

    /// Process only these files instead of discovering every source file
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Directory receiving the clean form, mirroring the layout below the base directory
    #[arg(long, value_name = "DIR")]
    clean_output: Option<PathBuf>,

    /// Write the editable form back over each input
    #[arg(long)]
    update_input: bool,

    /// TOML file holding the variable environment
    #[arg(long, value_name = "FILE")]
    variables: Option<PathBuf>,

    /// Set a variable, overriding the variables file
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Character marking a comment as a directive
    #[arg(long, default_value_t = '#')]
    command_prefix: char,

    /// Character marking a comment as disabled code
    #[arg(long, default_value_t = '-')]
    disabled_prefix: char,

    /// Maximum worker threads (default: JCYO_MAX_THREADS or 4)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Process files one after another
    #[arg(long)]
    sequential: bool,

    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Stop at the first failing file
    #[arg(long)]
    fail_fast: bool,

    /// Only report failures
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> JcyoOptions {
        JcyoOptions::new()
            .with_command_prefix(self.command_prefix)
            .with_disabled_prefix(self.disabled_prefix)
            .with_update_input(self.update_input)
    }

    fn load_variables(&self) -> Result<Variables, VariablesError> {
        let mut variables = match &self.variables {
            Some(path) => Variables::load(path)?,
            None => Variables::new(),
        };
        for assignment in &self.assignments {
            variables.set_assignment(assignment)?;
        }
        Ok(variables)
    }

    fn batch_config(&self, runtime: &RuntimeConfig) -> BatchConfig {
        let mut config = BatchConfig::from_preferences(&runtime.batch);

        if let Some(threads) = self.threads {
            config.max_threads = threads.max(1);
        }
        if self.sequential {
            config = config.sequential();
        }
        if self.no_recursive {
            config.recursive = false;
        }
        if self.fail_fast {
            config.fail_fast = true;
        }
        if let Some(clean_output) = &self.clean_output {
            config = config.exclude_directory(clean_output);
        }

        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let runtime = RuntimeConfig::from_env();
    logging::init_global_logging(&runtime.logging)?;

    let options = cli.options();
    options.validate()?;
    let variables = cli.load_variables()?;

    let mut processor = Processor::new(options, variables, &cli.base_dir);
    if let Some(clean_output) = &cli.clean_output {
        processor = processor.with_clean_output_directory(clean_output);
    }
    processor.validate()?;

    let config = cli.batch_config(&runtime);
    if !cli.quiet {
        println!("Processing: {}", cli.base_dir.display());
        println!(
            "Configuration: {} threads, recursive={}, fail_fast={}",
            config.max_threads, config.recursive, config.fail_fast
        );
    }

    let outcome = if cli.files.is_empty() {
        batch::process_directory(&processor, &config)
    } else {
        batch::process_files(&processor, &cli.files, &config)
    };

    match outcome {
        Ok(results) => {
            print_batch_results(&results, cli.quiet);
            print_run_report(cli.quiet);

            if results.has_failures() {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Batch processing failed: [{}] {}", error.error_code(), error);
            print_run_report(cli.quiet);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Diagnostics and totals for the run; in quiet mode only when something went wrong
fn print_run_report(quiet: bool) {
    if quiet && !logging::run_summary().has_diagnostics() {
        return;
    }
    if let Some(report) = logging::run_report() {
        eprint!("{}", report);
    }
}

fn print_batch_results(results: &BatchResults, quiet: bool) {
    if !quiet {
        println!("\n{}", results.summary());
        println!("  Files discovered: {}", results.files_discovered);
        println!("  Files processed: {}", results.files_processed);
        println!("  Rewritten: {}", results.written_count());

        if results.files_processed > 0 {
            let avg_time =
                results.processing_duration.as_secs_f64() / results.files_processed as f64;
            println!("  Average time per file: {:.4}s", avg_time);
        }

        for (file_path, outcome) in results.successful_files.iter().take(10) {
            let mut written = Vec::new();
            if outcome.editable_written {
                written.push("editable");
            }
            if outcome.clean_written {
                written.push("clean");
            }
            println!(
                "  {}: {} directives, {} disabled regions, {}",
                file_path.display(),
                outcome.result.stats.directives,
                outcome.result.stats.disabled_regions,
                if written.is_empty() {
                    "unchanged".to_string()
                } else {
                    format!("wrote {}", written.join(" + "))
                }
            );
        }
        if results.success_count() > 10 {
            println!("  ... and {} more", results.success_count() - 10);
        }
    }

    if results.has_failures() {
        eprintln!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            eprintln!("  {}: [{}] {}", file_path.display(), error.error_code(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jcyo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_arguments() {
        let cli = parse(&[
            "src",
            "--file",
            "src/A.java",
            "--file",
            "src/B.java",
            "--update-input",
            "--set",
            "DEBUG=true",
            "--command-prefix",
            "$",
            "--threads",
            "4",
            "--fail-fast",
            "--no-recursive",
        ]);

        assert_eq!(cli.base_dir, PathBuf::from("src"));
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.options().command_prefix, '$');
        assert_eq!(cli.options().disabled_prefix, '-');
        assert!(cli.options().update_input);

        let config = cli.batch_config(&RuntimeConfig::from_env());
        assert_eq!(config.max_threads, 4);
        assert!(config.fail_fast);
        assert!(!config.recursive);
    }

    #[test]
    fn test_assignments_override_defaults() {
        let cli = parse(&["src", "--set", "LEVEL=3", "--set", "NAME=x"]);
        let variables = cli.load_variables().unwrap();
        assert_eq!(variables.len(), 2);
        assert!(variables.get("level").is_some());
    }

    #[test]
    fn test_sequential_and_clean_output() {
        let cli = parse(&["src", "--sequential", "--clean-output", "out"]);
        let config = cli.batch_config(&RuntimeConfig::from_env());
        assert_eq!(config.max_threads, 1);
        assert_eq!(config.excluded_directories, vec![PathBuf::from("out")]);
    }

    #[test]
    fn test_invalid_assignment_is_rejected() {
        let cli = parse(&["src", "--set", "novalue"]);
        assert!(cli.load_variables().is_err());
    }
}
