#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the Quarry orchestrator.
//!
//! This crate provides a single [`Config`] type read from a TOML file that is
//! merged over embedded defaults (`defaults.toml` compiled into the binary).
//!
//! # Usage
//!
//! ```rust,no_run
//! use quarry_config::Config;
//!
//! let config = Config::load_file(std::path::Path::new("quarry.toml")).unwrap();
//! for phase in &config.phases {
//!     println!("{} -> {}", phase.name, phase.directory.display());
//! }
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`QUARRY_LOG` for the log level)
//! 2. **Config file** given on the command line
//! 3. **Embedded defaults**
//!
//! # Design
//!
//! This crate has **no dependencies on other internal quarry crates**.
//! Conversion from config types to domain types happens in the CLI.

/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// The embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the embedded defaults are malformed.
    pub fn defaults() -> ConfigResult<Self> {
        loader::defaults()
    }

    /// Load configuration from a file merged over the defaults.
    ///
    /// See [`loader::load_file`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse configuration text merged over the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text cannot be parsed or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content)
    }
}
