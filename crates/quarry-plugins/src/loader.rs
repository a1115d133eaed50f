//! Plugin loader - turn discovered packages into loaded modules.

use tracing::{debug, error, info};

use quarry_core::{DiscoveredUnits, LoadedPackage, load_package};

use crate::plugin::PluginCatalog;

/// Entry file that marks a directory as a plugin package.
pub const PLUGIN_MANIFEST_FILE: &str = "plugin.toml";

/// Packages that loaded successfully, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedModules {
    modules: Vec<LoadedPackage>,
}

impl LoadedModules {
    /// Iterate in load order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedPackage> {
        self.modules.iter()
    }

    /// Look up a module by its package name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LoadedPackage> {
        self.modules.iter().find(|module| module.name == name)
    }

    /// Module names in load order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name.as_str()).collect()
    }

    /// Number of loaded modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether nothing loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<LoadedPackage> for LoadedModules {
    fn from_iter<I: IntoIterator<Item = LoadedPackage>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LoadedModules {
    type Item = &'a LoadedPackage;
    type IntoIter = std::slice::Iter<'a, LoadedPackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

/// Load every discovered plugin package.
///
/// A package that fails to load is logged and left out; it never stops the
/// rest of the batch.
#[must_use]
pub fn load_modules(discovered: &DiscoveredUnits, catalog: &PluginCatalog) -> LoadedModules {
    let mut modules = Vec::with_capacity(discovered.len());

    for unit in discovered {
        match load_package(
            &unit.name,
            &unit.directory,
            PLUGIN_MANIFEST_FILE,
            catalog,
        ) {
            Ok(package) => {
                info!(plugin = %package.name, version = %package.version, "Loading plugin");
                debug!(path = %package.manifest_path.display(), "Module file path");
                debug!(exports = ?package.exports, "Module contents");
                modules.push(package);
            },
            Err(e) => {
                error!(
                    plugin = %unit.name,
                    path = %unit.directory.display(),
                    error = %e,
                    "Cannot load plugin"
                );
            },
        }
    }

    let loaded: LoadedModules = modules.into_iter().collect();
    debug!(plugins = ?loaded.names(), "Loaded plugins");
    loaded
}
