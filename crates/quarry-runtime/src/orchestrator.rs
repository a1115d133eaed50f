//! The orchestration run: discover, load, register, resolve, sort, execute.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use tracing::{debug, error, info, warn};

use quarry_core::discover;
use quarry_hooks::HookMap;
use quarry_plugins::{
    DependencyMap, ExecutionOrder, PLUGIN_MANIFEST_FILE, PluginCatalog, PluginError,
    PluginRegistry, PluginSettings, collect_dependencies, load_modules, register_modules,
    resolve_dependencies, topological_sort,
};
use quarry_telemetry::{RunContext, RunGuard};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::policy::ExecutionPolicy;
use crate::report::{ExecutionStage, PluginOutcome, RunReport};

/// Drives one set of plugins through a full run.
///
/// An orchestrator owns its descriptor store; it is not meant to be shared
/// between runs. After [`Orchestrator::run`] the final registry is available
/// through [`Orchestrator::registry`] or [`Orchestrator::into_registry`].
pub struct Orchestrator {
    catalog: PluginCatalog,
    hooks: HookMap,
    settings: PluginSettings,
    policy: ExecutionPolicy,
    context: Option<RunContext>,
    registry: PluginRegistry,
}

impl Orchestrator {
    /// Create an orchestrator over a plugin catalog, the hooks plugins may
    /// trigger, and run-wide plugin settings.
    #[must_use]
    pub fn new(catalog: PluginCatalog, hooks: HookMap, settings: PluginSettings) -> Self {
        Self {
            catalog,
            hooks,
            settings,
            policy: ExecutionPolicy::default(),
            context: None,
            registry: PluginRegistry::new(),
        }
    }

    /// Set the execution failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the run context used to correlate this run's log lines.
    ///
    /// Without one, every call to [`Orchestrator::run`] gets a fresh
    /// context and run id.
    #[must_use]
    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The execution failure policy.
    #[must_use]
    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Registered plugins from the last run.
    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Consume the orchestrator, returning the registry of the last run.
    #[must_use]
    pub fn into_registry(self) -> PluginRegistry {
        self.registry
    }

    /// Run every phase once over the plugins under `root`.
    ///
    /// A missing `root` or a root with no plugin packages is a successful
    /// run that does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Discovery`] if `root` cannot be scanned,
    /// [`OrchestratorError::Dependency`] if a dependency file cannot be read,
    /// and [`OrchestratorError::Execution`] for the first plugin failure when
    /// the policy is [`ExecutionPolicy::Abort`].
    pub fn run(&mut self, root: Option<&Path>) -> OrchestratorResult<RunReport> {
        let context = self.context.clone().unwrap_or_default();
        let guard = RunGuard::new(context);
        let mut report = RunReport::empty(guard.context().run_id);

        let discovered = discover(root, PLUGIN_MANIFEST_FILE)?;
        report.discovered = discovered.names().into_iter().map(String::from).collect();
        if discovered.is_empty() {
            info!("No plugins discovered");
            self.registry = PluginRegistry::new();
            return Ok(report);
        }

        let loaded = load_modules(&discovered, &self.catalog);
        report.loaded = loaded.names().into_iter().map(String::from).collect();

        let mut registry = register_modules(&loaded, &self.catalog, &self.hooks, &self.settings);
        report.registered = registry.names().into_iter().map(String::from).collect();

        let dependencies = match collect_dependencies(&mut registry) {
            Ok(dependencies) => dependencies,
            Err(e) => {
                self.registry = registry;
                return Err(e.into());
            },
        };
        let resolution = resolve_dependencies(&mut registry, &dependencies);
        let order = topological_sort(&registry, &dependencies, &resolution);

        let executed = self.execute(&mut registry, &dependencies, &order);
        self.registry = registry;

        report.outcomes = executed?;
        report.dependencies = dependencies;
        report.resolution = resolution;
        report.order = order;

        info!(
            completed = report.completed().len(),
            failed = report.failed().len(),
            skipped = report.skipped().len(),
            not_ordered = report.order.stalled.len(),
            "Run finished"
        );
        Ok(report)
    }

    fn execute(
        &self,
        registry: &mut PluginRegistry,
        dependencies: &DependencyMap,
        order: &ExecutionOrder,
    ) -> OrchestratorResult<Vec<(String, PluginOutcome)>> {
        let mut outcomes = Vec::with_capacity(order.len());
        let mut incomplete: HashSet<&str> = HashSet::new();

        for name in &order.order {
            let deps = dependencies.get(name).unwrap_or_default();
            if let Some(dependency) = deps.iter().find(|dep| incomplete.contains(dep.as_str())) {
                warn!(
                    plugin = %name,
                    dependency = %dependency,
                    "Skipping plugin, dependency did not complete"
                );
                incomplete.insert(name.as_str());
                outcomes.push((
                    name.clone(),
                    PluginOutcome::Skipped {
                        dependency: dependency.clone(),
                    },
                ));
                continue;
            }

            let Some(record) = registry.get_mut(name) else {
                continue;
            };

            info!(plugin = %name, "Executing plugin");
            match run_plugin(record.instance_mut()) {
                Ok(()) => {
                    debug!(plugin = %name, "Plugin completed");
                    outcomes.push((name.clone(), PluginOutcome::Completed));
                },
                Err((stage, e)) => {
                    error!(plugin = %name, stage = %stage, error = %e, "Plugin failed");
                    if self.policy == ExecutionPolicy::Abort {
                        return Err(OrchestratorError::Execution {
                            plugin: name.clone(),
                            stage,
                            source: e,
                        });
                    }
                    incomplete.insert(name.as_str());
                    outcomes.push((
                        name.clone(),
                        PluginOutcome::Failed {
                            stage,
                            error: e.to_string(),
                        },
                    ));
                },
            }
        }

        Ok(outcomes)
    }
}

fn run_plugin(
    plugin: &mut dyn quarry_plugins::Plugin,
) -> Result<(), (ExecutionStage, PluginError)> {
    let output = plugin
        .execute()
        .map_err(|e| (ExecutionStage::Execute, e))?;
    plugin
        .process_results(output)
        .map_err(|e| (ExecutionStage::ProcessResults, e))
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("catalog", &self.catalog)
            .field("hooks", &self.hooks)
            .field("policy", &self.policy)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
