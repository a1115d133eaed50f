//! Run reports.

use serde::Serialize;
use uuid::Uuid;

use quarry_plugins::{DependencyMap, ExecutionOrder, Resolution};

/// Which plugin call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStage {
    /// `Plugin::execute`.
    Execute,
    /// `Plugin::process_results`.
    ProcessResults,
}

impl std::fmt::Display for ExecutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Execute => write!(f, "execute"),
            Self::ProcessResults => write!(f, "process_results"),
        }
    }
}

/// What happened to one ordered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PluginOutcome {
    /// Both calls succeeded.
    Completed,
    /// A call returned an error.
    Failed {
        /// The failing call.
        stage: ExecutionStage,
        /// Rendered error.
        error: String,
    },
    /// Not run because a dependency failed or was skipped.
    Skipped {
        /// The dependency that did not complete.
        dependency: String,
    },
}

impl PluginOutcome {
    /// Whether the plugin ran to completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Everything a run produced, for callers to inspect.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run identifier (matches the `run_id` on log lines).
    pub run_id: Uuid,
    /// Package names found by discovery.
    pub discovered: Vec<String>,
    /// Package names that loaded.
    pub loaded: Vec<String>,
    /// Registered plugin names, in registration order.
    pub registered: Vec<String>,
    /// Declared dependencies per plugin.
    pub dependencies: DependencyMap,
    /// Resolution outcome.
    pub resolution: Resolution,
    /// Execution order and the plugins left out of it.
    pub order: ExecutionOrder,
    /// Outcome per ordered plugin, in execution order.
    pub outcomes: Vec<(String, PluginOutcome)>,
}

impl RunReport {
    pub(crate) fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            discovered: Vec::new(),
            loaded: Vec::new(),
            registered: Vec::new(),
            dependencies: DependencyMap::new(),
            resolution: Resolution::default(),
            order: ExecutionOrder::default(),
            outcomes: Vec::new(),
        }
    }

    /// Outcome of one plugin, if it was ordered.
    #[must_use]
    pub fn outcome(&self, plugin: &str) -> Option<&PluginOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == plugin)
            .map(|(_, outcome)| outcome)
    }

    /// Plugins that completed, in execution order.
    #[must_use]
    pub fn completed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_completed())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Plugins that failed.
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PluginOutcome::Failed { .. }))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Plugins skipped because a dependency did not complete.
    #[must_use]
    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PluginOutcome::Skipped { .. }))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether every ordered plugin completed.
    ///
    /// Plugins left out of the order (cycles, unregistered dependencies)
    /// do not count against success; see [`RunReport::is_complete`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_completed())
    }

    /// Whether every registered plugin was ordered and completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.order.is_complete() && self.is_success()
    }
}
