//! Hook manager - discover, load and construct hooks.

use std::path::Path;

use tracing::{debug, error, info, warn};

use quarry_core::{DiscoveredUnits, DiscoveryResult, LoadedPackage, discover, load_package};

use crate::hook::{HOOK_MANIFEST_FILE, HookCatalog, HookContext};
use crate::map::{HookMap, HookRecord};

/// Builds the [`HookMap`] for a run.
///
/// Discovery failures are returned to the caller; everything after that
/// (a package that fails to load, a factory that fails) is logged and
/// only drops the affected hook.
#[derive(Debug)]
pub struct HookManager {
    catalog: HookCatalog,
    discovered: DiscoveredUnits,
}

impl HookManager {
    /// Create a manager backed by `catalog`.
    #[must_use]
    pub fn new(catalog: HookCatalog) -> Self {
        Self {
            catalog,
            discovered: DiscoveredUnits::new(),
        }
    }

    /// Discover hook packages under `dir`.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if `dir` is missing or unreadable.
    pub fn discover(&mut self, dir: Option<&Path>) -> DiscoveryResult<&DiscoveredUnits> {
        if dir.is_none() {
            info!("No hooks to discover");
        }
        self.discovered = discover(dir, HOOK_MANIFEST_FILE)?;
        debug!(hooks = ?self.discovered.names(), "Discovered hooks");
        Ok(&self.discovered)
    }

    /// Hook packages found by the last [`HookManager::discover`] call.
    #[must_use]
    pub fn discovered(&self) -> &DiscoveredUnits {
        &self.discovered
    }

    /// Load every discovered package and construct its hooks.
    #[must_use]
    pub fn register(&self) -> HookMap {
        let mut records: Vec<HookRecord> = Vec::new();

        for unit in &self.discovered {
            let package = match load_package(
                &unit.name,
                &unit.directory,
                HOOK_MANIFEST_FILE,
                &self.catalog,
            ) {
                Ok(package) => package,
                Err(e) => {
                    error!(hook = %unit.name, error = %e, "Failed to import hook");
                    continue;
                },
            };
            info!(hook = %package.name, version = %package.version, "Loading hook");

            if let Some(record) = self.construct(&package) {
                records.push(record);
            }
        }

        let map = HookMap::from_records(records);
        debug!(hooks = ?map.names(), "Registered hooks");
        map
    }

    /// Discover and register in one step.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if `dir` is missing or unreadable.
    pub fn load(mut self, dir: Option<&Path>) -> DiscoveryResult<HookMap> {
        self.discover(dir)?;
        Ok(self.register())
    }

    /// Build the hook for a loaded package. With several exports the last
    /// one that constructs successfully is kept under the package name.
    fn construct(&self, package: &LoadedPackage) -> Option<HookRecord> {
        let mut kept: Option<HookRecord> = None;

        for type_name in &package.exports {
            let Some(factory) = self.catalog.get(type_name) else {
                continue;
            };
            let ctx = HookContext {
                name: package.name.clone(),
                type_name: type_name.clone(),
                directory: package.directory.clone(),
            };

            match factory(&ctx) {
                Ok(instance) => {
                    info!(class = %type_name, hook = %package.name, "Registering class to hook");
                    if let Some(previous) = &kept {
                        warn!(
                            hook = %package.name,
                            previous = %previous.type_name,
                            replacement = %type_name,
                            "Hook package exports several types, keeping the last"
                        );
                    }
                    kept = Some(HookRecord {
                        name: package.name.clone(),
                        type_name: type_name.clone(),
                        version: package.version.clone(),
                        directory: package.directory.clone(),
                        instance,
                    });
                },
                Err(e) => {
                    error!(
                        hook = %package.name,
                        class = %type_name,
                        error = %e,
                        "Failed to construct hook"
                    );
                },
            }
        }

        if package.exports.is_empty() {
            warn!(hook = %package.name, "Hook package exports no types");
        }
        kept
    }
}
