//! Phase handlers used by frontends.
//!
//! A frontend processes several plugin phases (e.g. "core" then "users")
//! against one hook map. [`HookHandler`] builds that map once and
//! [`PluginHandler`] runs each phase, turning every failure into a logged
//! `false` so one bad phase never takes down the others.

use std::path::Path;

use tracing::{error, info};

use quarry_core::{DiscoveryError, DiscoveryResult};
use quarry_hooks::{HookCatalog, HookManager, HookMap};
use quarry_plugins::{PluginCatalog, PluginSettings};
use quarry_telemetry::RunContext;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::orchestrator::Orchestrator;
use crate::policy::ExecutionPolicy;
use crate::report::RunReport;

/// Builds the hook map shared by every phase.
#[derive(Debug, Clone)]
pub struct HookHandler {
    catalog: HookCatalog,
}

impl HookHandler {
    /// Create a handler backed by `catalog`.
    #[must_use]
    pub fn new(catalog: HookCatalog) -> Self {
        Self { catalog }
    }

    /// Discover and construct the hooks under `dir`.
    ///
    /// No directory yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if `dir` is missing or unreadable.
    pub fn load(&self, dir: Option<&Path>) -> DiscoveryResult<HookMap> {
        HookManager::new(self.catalog.clone()).load(dir)
    }
}

/// Runs one plugin phase per call.
#[derive(Debug, Clone)]
pub struct PluginHandler {
    catalog: PluginCatalog,
    hooks: HookMap,
    settings: PluginSettings,
    policy: ExecutionPolicy,
    source: String,
}

impl PluginHandler {
    /// Create a handler that runs plugins from `catalog` with access to
    /// `hooks`.
    #[must_use]
    pub fn new(catalog: PluginCatalog, hooks: HookMap) -> Self {
        Self {
            catalog,
            hooks,
            settings: PluginSettings::new(),
            policy: ExecutionPolicy::default(),
            source: "quarry".to_string(),
        }
    }

    /// Settings passed to every plugin.
    #[must_use]
    pub fn with_settings(mut self, settings: PluginSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Execution failure policy for every phase.
    #[must_use]
    pub fn with_policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name of the component starting runs, recorded on each run's span.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Run one phase and return its report.
    ///
    /// # Errors
    ///
    /// Returns the orchestrator's error; see [`Orchestrator::run`].
    pub fn run(&self, kind: &str, dir: Option<&Path>) -> OrchestratorResult<RunReport> {
        let context = RunContext::new(self.source.clone()).with_phase(kind);
        Orchestrator::new(self.catalog.clone(), self.hooks.clone(), self.settings.clone())
            .with_policy(self.policy)
            .with_context(context)
            .run(dir)
    }

    /// Run one phase, logging the outcome.
    ///
    /// Returns `true` only if the phase ran and every ordered plugin
    /// completed.
    #[must_use]
    pub fn process(&self, kind: &str, dir: Option<&Path>) -> bool {
        info!("Processing {kind} plugins...");

        match self.run(kind, dir) {
            Ok(report) if report.is_success() => {
                info!("Processing {kind} plugins successfully...");
                true
            },
            Ok(report) => {
                error!(
                    failed = ?report.failed(),
                    skipped = ?report.skipped(),
                    "Some {kind} plugins did not complete"
                );
                false
            },
            Err(OrchestratorError::Discovery(
                DiscoveryError::RootNotFound { path } | DiscoveryError::NotADirectory { path },
            )) => {
                error!("Directory '{}' not found...", path.display());
                false
            },
            Err(e) => {
                error!(error = %e, "An error occurred while processing {kind} plugins");
                false
            },
        }
    }
}
