//! Execution ordering.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{error, info};

use crate::dependency::DependencyMap;
use crate::resolver::Resolution;
use crate::registry::PluginRegistry;

/// Result of [`topological_sort`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionOrder {
    /// Plugins in execution order.
    pub order: Vec<String>,
    /// Registered plugins left out of the order, in registration order.
    pub stalled: Vec<String>,
}

impl ExecutionOrder {
    /// Whether every registered plugin was ordered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stalled.is_empty()
    }

    /// Number of ordered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Order resolved plugins so each runs after everything it depends on.
///
/// Each pass scans the registry in registration order and appends every
/// resolved plugin whose dependencies are already ordered, so plugins that
/// become ready together keep their registration order. Sorting stops when a
/// pass adds nothing. Plugins caught in a cycle or behind an unresolved
/// dependency are left out and reported in a single error.
#[must_use]
pub fn topological_sort(
    registry: &PluginRegistry,
    dependencies: &DependencyMap,
    resolution: &Resolution,
) -> ExecutionOrder {
    let mut order: Vec<String> = Vec::with_capacity(registry.len());
    let mut ordered: HashSet<&str> = HashSet::with_capacity(registry.len());

    loop {
        let mut added = false;

        for name in registry.names() {
            if ordered.contains(name) || !resolution.is_resolved(name) {
                continue;
            }
            let deps = dependencies.get(name).unwrap_or_default();
            if deps.iter().all(|dep| ordered.contains(dep.as_str())) {
                ordered.insert(name);
                order.push(name.to_string());
                added = true;
            }
        }

        if !added {
            break;
        }
    }

    let stalled: Vec<String> = registry
        .names()
        .into_iter()
        .filter(|name| !ordered.contains(name))
        .map(String::from)
        .collect();

    if !stalled.is_empty() {
        error!(
            stalled = ?stalled,
            "Cycle detected or unresolved dependencies, these plugins will not run"
        );
    }
    info!(order = ?order, "Sorted plugins");

    ExecutionOrder { order, stalled }
}
