//! Dependency resolution.
//!
//! Resolution is an iterative fixed point over the registry. A plugin is
//! resolved once every plugin it names is registered and resolved; at that
//! point its instance is rebuilt from its factory (the activation barrier),
//! so the instance that runs is one created after its prerequisites were
//! confirmed.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::dependency::DependencyMap;
use crate::error::DependencyError;
use crate::registry::PluginRegistry;

/// Outcome of [`resolve_dependencies`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Resolved plugins, in the order they resolved.
    pub resolved: Vec<String>,
    /// Plugins that never resolved, in registration order.
    pub unresolved: Vec<String>,
    /// Plugins naming dependencies that are not registered, with the
    /// missing names.
    pub unregistered: Vec<(String, Vec<String>)>,
}

impl Resolution {
    /// Whether `plugin` resolved.
    #[must_use]
    pub fn is_resolved(&self, plugin: &str) -> bool {
        self.resolved.iter().any(|name| name == plugin)
    }

    /// Whether every registered plugin resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolve dependencies and activate every plugin whose prerequisites are
/// satisfied.
///
/// Plugins naming an unregistered dependency are reported once and never
/// resolved. Plugins whose rebuild fails stay unresolved. The loop stops
/// when everything is resolved or a full pass makes no progress.
pub fn resolve_dependencies(
    registry: &mut PluginRegistry,
    dependencies: &DependencyMap,
) -> Resolution {
    let names: Vec<String> = registry.names().into_iter().map(String::from).collect();
    let mut resolved: Vec<String> = Vec::with_capacity(names.len());
    let mut resolved_set: HashSet<String> = HashSet::with_capacity(names.len());
    let mut blocked: HashSet<String> = HashSet::new();
    let mut unregistered: Vec<(String, Vec<String>)> = Vec::new();

    loop {
        let mut progressed = false;

        for name in &names {
            if resolved_set.contains(name) || blocked.contains(name) {
                continue;
            }
            let deps = dependencies.get(name).unwrap_or_default();

            let missing: Vec<String> = deps
                .iter()
                .filter(|dep| !registry.contains(dep))
                .cloned()
                .collect();
            if !missing.is_empty() {
                let e = DependencyError::Unregistered {
                    plugin: name.clone(),
                    missing: missing.clone(),
                };
                error!(
                    plugin = %name,
                    missing = ?missing,
                    error = %e,
                    "Plugin has unregistered dependencies"
                );
                unregistered.push((name.clone(), missing));
                blocked.insert(name.clone());
                continue;
            }

            if !deps.iter().all(|dep| resolved_set.contains(dep)) {
                continue;
            }

            let Some(record) = registry.get_mut(name) else {
                continue;
            };
            match record.activate() {
                Ok(()) => {
                    debug!(plugin = %name, "Activated plugin");
                    resolved_set.insert(name.clone());
                    resolved.push(name.clone());
                    progressed = true;
                },
                Err(e) => {
                    error!(plugin = %name, error = %e, "Failed to activate plugin");
                    blocked.insert(name.clone());
                },
            }
        }

        if !progressed || resolved.len() == names.len() {
            break;
        }
    }

    let unresolved: Vec<String> = names
        .into_iter()
        .filter(|name| !resolved_set.contains(name))
        .collect();

    info!(
        resolved = resolved.len(),
        unresolved = unresolved.len(),
        "Resolved plugin dependencies"
    );

    Resolution {
        resolved,
        unresolved,
        unregistered,
    }
}
