pub mod compile_time {
    pub mod file_processing {
        /// Maximum source file size accepted for processing (10MB)
        /// SECURITY: Prevents DoS via enormous inputs
        pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

        /// Threshold for considering a file "large" (1MB)
        pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024;

        /// Extension of files picked up by discovery
        pub const SOURCE_EXTENSION: &str = "java";

        /// File names containing this character are variants and never processed
        pub const VARIANT_SEPARATOR: char = '-';
    }

    pub mod lexical {
        /// Maximum number of tokens produced for one file
        /// SECURITY: Bounds memory held by token buffers
        pub const MAX_TOKEN_COUNT: usize = 5_000_000;
    }

    pub mod directive {
        /// Maximum nesting depth of directive blocks
        /// SECURITY: Bounds the applier's block stack
        pub const MAX_DIRECTIVE_DEPTH: usize = 256;
    }

    pub mod expression {
        /// Maximum nesting of parentheses and prefix operators in one expression
        /// SECURITY: Prevents stack exhaustion in the recursive descent parser
        pub const MAX_EXPRESSION_DEPTH: usize = 128;

        /// Maximum number of variables loaded from one environment source
        pub const MAX_VARIABLES: usize = 10_000;
    }

    pub mod batch_processing {
        /// Maximum worker threads for parallel processing
        pub const MAX_WORKER_THREADS: usize = 8;

        /// Maximum files processed in one batch
        /// SECURITY: Prevents runaway discovery on huge trees
        pub const MAX_FILES_PER_BATCH: usize = 10_000;
    }

    pub mod logging {
        /// Maximum log message length
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;

        /// Maximum log events kept per file before truncation
        pub const MAX_LOG_EVENTS_PER_FILE: usize = 1_000;
    }
}
