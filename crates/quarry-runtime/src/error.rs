//! Orchestrator error types.

use thiserror::Error;

use quarry_core::DiscoveryError;
use quarry_plugins::{DependencyError, PluginError};

use crate::report::ExecutionStage;

/// Errors that fail a whole orchestration run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The plugin root could not be scanned.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// A plugin's dependency declarations could not be read.
    #[error("Dependency error: {0}")]
    Dependency(#[from] DependencyError),

    /// A plugin failed while the run was configured to abort on failure.
    #[error("Plugin {plugin} failed during {stage}: {source}")]
    Execution {
        /// The failing plugin.
        plugin: String,
        /// Which call failed.
        stage: ExecutionStage,
        /// The plugin's error.
        #[source]
        source: PluginError,
    },
}

/// Result type for orchestration runs.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
