//! Logging macros
//!
//! Every macro takes optional `"key" => value` fields after the message;
//! values may be any `Display` type and are only formatted when the event
//! will actually be logged or reported.

#[doc(hidden)]
#[macro_export]
macro_rules! __jcyo_log {
    ($level:expr, $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::enabled($level) {
            $crate::logging::emit(
                $level,
                $code,
                $message,
                &[$(($key, &$value as &dyn ::std::fmt::Display)),*],
            );
        }
    };
}

/// Error with a code; reported under the current file
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__jcyo_log!($crate::logging::LogLevel::Error, $code, $message $(, $key => $value)*)
    };
}

/// Warning with a code; reported under the current file
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__jcyo_log!($crate::logging::LogLevel::Warning, $code, $message $(, $key => $value)*)
    };
}

/// Progress note with a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__jcyo_log!($crate::logging::LogLevel::Info, $code, $message $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__jcyo_log!(
            $crate::logging::LogLevel::Info,
            $crate::logging::codes::UNCODED,
            $message
            $(, $key => $value)*
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__jcyo_log!(
            $crate::logging::LogLevel::Debug,
            $crate::logging::codes::UNCODED,
            $message
            $(, $key => $value)*
        )
    };
}

/// Success code plus the elapsed time of `duration` in milliseconds
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            $(, $key => $value)*
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_accept_display_fields() {
        let path = std::path::PathBuf::from("src/Main.java");
        let duration = std::time::Duration::from_millis(150);

        log_error!(codes::directive::PARSE_FAILURE, "Unknown directive iff",
            "file" => path.display(),
            "line" => 3
        );
        log_error!(codes::system::INTERNAL_ERROR, "no fields");
        log_success!(codes::success::PIPELINE_COMPLETE, "Pipeline complete",
            "tokens" => 157,
        );
        log_info!("Processing file", "is_large" => false);
        log_warning!(codes::lexical::NESTED_DISABLED_FLEX, "Nested disabled flex comment");
        log_debug!("Applied directive", "enabled" => true);
        log_performance!(codes::success::FILE_PROCESSING_SUCCESS, "File read",
            duration = duration,
            "size" => 1024
        );
    }
}
