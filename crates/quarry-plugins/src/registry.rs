//! Plugin registry - the descriptor store for one orchestration run.
//!
//! Every type exported by a loaded module becomes one [`PluginRecord`]
//! keyed by the type's own name, so a module exporting N types registers
//! N plugins sharing one load.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, error, info, warn};

use quarry_core::LoadedPackage;
use quarry_hooks::HookMap;

use crate::error::RegistrationError;
use crate::loader::LoadedModules;
use crate::plugin::{PluginCatalog, PluginContext, PluginSettings};
use crate::record::PluginRecord;

/// Insertion-ordered store of registered plugins.
#[derive(Default)]
pub struct PluginRegistry {
    records: Vec<PluginRecord>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    ///
    /// A replaced record keeps its original position in the registration
    /// order.
    pub fn insert(&mut self, record: PluginRecord) -> Option<PluginRecord> {
        if let Some(&slot) = self.index.get(record.name())
            && let Some(existing) = self.records.get_mut(slot)
        {
            return Some(std::mem::replace(existing, record));
        }
        self.index.insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        None
    }

    /// Get a record by plugin name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginRecord> {
        self.index.get(name).and_then(|&slot| self.records.get(slot))
    }

    /// Get a mutable record by plugin name.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PluginRecord> {
        let slot = *self.index.get(name)?;
        self.records.get_mut(slot)
    }

    /// Whether a plugin with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Plugin names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(PluginRecord::name).collect()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginRecord> {
        self.records.iter()
    }

    /// Iterate mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PluginRecord> {
        self.records.iter_mut()
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugin_count", &self.records.len())
            .field("plugins", &self.names())
            .finish()
    }
}

/// Register every type exported by every loaded module.
///
/// Failures are scoped to the module (missing directory) or to the single
/// export whose factory failed; both are logged and skipped. When two
/// exports share a name the later registration wins and a warning names
/// both sources.
#[must_use]
pub fn register_modules(
    loaded: &LoadedModules,
    catalog: &PluginCatalog,
    hooks: &HookMap,
    settings: &PluginSettings,
) -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    for module in loaded {
        if let Err(e) = check_module(module) {
            error!(module = %module.name, error = %e, "Skipping module");
            continue;
        }
        if module.exports.is_empty() {
            warn!(module = %module.name, "Module exports no plugin types");
            continue;
        }

        for export in &module.exports {
            match build_record(module, export, catalog, hooks, settings) {
                Ok(record) => {
                    let source = record.source_directory().display().to_string();
                    if let Some(previous) = registry.insert(record) {
                        warn!(
                            plugin = %export,
                            previous = %previous.source_directory().display(),
                            replacement = %source,
                            "Plugin name registered twice, keeping the later registration"
                        );
                    }
                    info!(plugin = %export, module = %module.name, "Registered plugin");
                },
                Err(e) => {
                    error!(
                        module = %module.name,
                        plugin = %export,
                        error = %e,
                        "Failed to register plugin"
                    );
                },
            }
        }
    }

    debug!(plugins = ?registry.names(), "Registered plugins");
    registry
}

fn check_module(module: &LoadedPackage) -> Result<(), RegistrationError> {
    if module.directory.as_os_str().is_empty() || !module.directory.is_dir() {
        return Err(RegistrationError::MissingDirectory {
            module: module.name.clone(),
        });
    }
    Ok(())
}

fn build_record(
    module: &LoadedPackage,
    export: &str,
    catalog: &PluginCatalog,
    hooks: &HookMap,
    settings: &PluginSettings,
) -> Result<PluginRecord, RegistrationError> {
    let factory = catalog
        .get(export)
        .cloned()
        .ok_or_else(|| RegistrationError::MissingFactory {
            plugin: export.to_string(),
        })?;

    let context = PluginContext {
        name: export.to_string(),
        directory: module.directory.clone(),
        hooks: hooks.clone(),
        settings: settings.clone(),
    };

    PluginRecord::build(
        &module.name,
        &module.version,
        &module.manifest_path,
        context,
        factory,
    )
    .map_err(|source| RegistrationError::Construction {
        plugin: export.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::loader::{PLUGIN_MANIFEST_FILE, load_modules};
    use crate::plugin::plugin_factory;
    use crate::testing::{Recorder, count, package, recording_catalog};
    use quarry_core::discover;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn register(root: &Path, catalog: &PluginCatalog) -> PluginRegistry {
        let discovered = discover(Some(root), PLUGIN_MANIFEST_FILE).unwrap();
        let loaded = load_modules(&discovered, catalog);
        register_modules(&loaded, catalog, &HookMap::empty(), &PluginSettings::new())
    }

    #[test]
    fn test_register_each_export() {
        let temp_dir = TempDir::new().unwrap();
        package(
            temp_dir.path(),
            "scanners",
            "version = \"1.0\"\nexports = [\"Ping\", \"Arp\"]\n",
        );
        let (catalog, log) = recording_catalog(&["Ping", "Arp"]);

        let registry = register(temp_dir.path(), &catalog);

        assert_eq!(registry.names(), vec!["Ping", "Arp"]);
        assert_eq!(registry.get("Ping").unwrap().module_name(), "scanners");
        assert_eq!(count(&log, "new:Ping"), 1);
        assert!(!registry.get("Arp").unwrap().is_activated());
    }

    #[test]
    fn test_register_zero_exports() {
        let temp_dir = TempDir::new().unwrap();
        package(temp_dir.path(), "empty", "version = \"1.0\"\n");
        let (catalog, _log) = recording_catalog(&["Ping"]);

        let registry = register(temp_dir.path(), &catalog);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_does_not_execute() {
        let temp_dir = TempDir::new().unwrap();
        package(temp_dir.path(), "p", "version = \"1.0\"\nexports = [\"Ping\"]\n");
        let (catalog, log) = recording_catalog(&["Ping"]);

        register(temp_dir.path(), &catalog);
        assert_eq!(*log.lock().unwrap(), vec!["new:Ping"]);
    }

    #[test]
    #[traced_test]
    fn test_register_name_collision_last_wins() {
        let temp_dir = TempDir::new().unwrap();
        package(temp_dir.path(), "a", "version = \"1.0\"\nexports = [\"Ping\"]\n");
        let later = package(temp_dir.path(), "b", "version = \"2.0\"\nexports = [\"Ping\"]\n");
        let (catalog, _log) = recording_catalog(&["Ping"]);

        let registry = register(temp_dir.path(), &catalog);

        assert_eq!(registry.len(), 1);
        let record = registry.get("Ping").unwrap();
        assert_eq!(record.source_directory(), later.as_path());
        assert_eq!(record.version(), "2.0");
        assert!(logs_contain(
            "Plugin name registered twice, keeping the later registration"
        ));
    }

    #[test]
    fn test_register_factory_failure_is_scoped() {
        let temp_dir = TempDir::new().unwrap();
        package(
            temp_dir.path(),
            "mixed",
            "version = \"1.0\"\nexports = [\"Broken\", \"Ping\"]\n",
        );
        let (mut catalog, _log) = recording_catalog(&["Ping"]);
        catalog.register(
            "Broken",
            plugin_factory(|_ctx: &PluginContext| -> Result<Recorder, PluginError> {
                Err(PluginError::Execution("no interface".into()))
            }),
        );

        let registry = register(temp_dir.path(), &catalog);
        assert_eq!(registry.names(), vec!["Ping"]);
    }

    #[test]
    fn test_register_missing_directory() {
        let (catalog, _log) = recording_catalog(&["Ping"]);
        let loaded: LoadedModules = [LoadedPackage {
            name: "ghost".into(),
            directory: PathBuf::new(),
            manifest_path: PathBuf::from("plugin.toml"),
            version: "1.0".into(),
            description: None,
            exports: vec!["Ping".into()],
        }]
        .into_iter()
        .collect();

        let registry =
            register_modules(&loaded, &catalog, &HookMap::empty(), &PluginSettings::new());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_debug_impl() {
        let registry = PluginRegistry::new();
        let debug = format!("{registry:?}");
        assert!(debug.contains("PluginRegistry"));
        assert!(debug.contains("plugin_count"));
    }
}
