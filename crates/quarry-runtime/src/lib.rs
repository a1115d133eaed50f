//! Quarry Runtime - the plugin orchestration loop.
//!
//! This crate provides:
//! - [`Orchestrator`], which runs every plugin phase once in fixed order:
//!   discover, load, register, collect dependencies, resolve, sort, then
//!   `execute` and `process_results` for each plugin in the sorted order
//! - [`ExecutionPolicy`], which decides what a plugin failure does to the
//!   rest of the run
//! - [`RunReport`], the inspectable outcome of a run
//! - [`PluginHandler`] and [`HookHandler`], the phase wrappers frontends
//!   drive
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_runtime::prelude::*;
//!
//! let hooks = HookHandler::new(hook_catalog).load(Some(Path::new("hooks")))?;
//! let mut orchestrator = Orchestrator::new(plugin_catalog, hooks, PluginSettings::new())
//!     .with_policy(ExecutionPolicy::Continue);
//!
//! let report = orchestrator.run(Some(Path::new("plugins/core")))?;
//! assert!(report.is_success());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod handler;
pub mod orchestrator;
pub mod policy;
pub mod report;

pub use error::{OrchestratorError, OrchestratorResult};
pub use handler::{HookHandler, PluginHandler};
pub use orchestrator::Orchestrator;
pub use policy::ExecutionPolicy;
pub use report::{ExecutionStage, PluginOutcome, RunReport};
