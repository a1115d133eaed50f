//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quarry_runtime::prelude::*;` to import all essential types.

// Orchestration
pub use crate::{ExecutionPolicy, HookHandler, Orchestrator, PluginHandler};

// Reports
pub use crate::{ExecutionStage, PluginOutcome, RunReport};

// Errors
pub use crate::{OrchestratorError, OrchestratorResult};

// Types needed to build an orchestrator
pub use quarry_hooks::{HookCatalog, HookMap};
pub use quarry_plugins::{PluginCatalog, PluginSettings};
