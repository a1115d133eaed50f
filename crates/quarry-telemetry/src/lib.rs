//! Quarry Telemetry - Logging and run correlation for the Quarry orchestrator.
//!
//! This crate provides:
//! - Logging setup writing to the console and, optionally, a log file
//! - Run context so every log line of a run carries the same run id
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_telemetry::{FileLogConfig, LogConfig, LogFormat, RunContext, setup_logging};
//!
//! # fn main() -> Result<(), quarry_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_file(FileLogConfig::new("logs"))
//!     .with_directive("quarry_plugins=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RunContext::new("cli").with_phase("core");
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!("Processing core plugins...");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{RunContext, RunGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
