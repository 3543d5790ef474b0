//! Configuration module for jcyo
//!
//! Hard limits live in [`constants::compile_time`] and cannot be changed at
//! runtime. User preferences live in [`runtime`] and default from `JCYO_*`
//! environment variables.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::RuntimeConfig;

/// Build information
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("JCYO_BUILD_PROFILE").unwrap_or(if cfg!(debug_assertions) {
            "development"
        } else {
            "release"
        })
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
