//! Helpers shared by this crate's unit tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use quarry_core::discover;
use quarry_hooks::HookMap;
use tempfile::TempDir;

use crate::dependency::{DEPENDENCY_FILE, DependencyMap, collect_dependencies};
use crate::error::PluginResult;
use crate::loader::{PLUGIN_MANIFEST_FILE, load_modules};
use crate::plugin::{
    Plugin, PluginCatalog, PluginContext, PluginOutput, PluginSettings, plugin_factory,
};
use crate::registry::{PluginRegistry, register_modules};

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

/// Plugin that records construction and calls into a shared log.
pub(crate) struct Recorder {
    name: String,
    log: CallLog,
}

impl Plugin for Recorder {
    fn execute(&mut self) -> PluginResult<PluginOutput> {
        self.log.lock().unwrap().push(format!("execute:{}", self.name));
        Ok(serde_json::json!({ "plugin": self.name }))
    }

    fn process_results(&mut self, _output: PluginOutput) -> PluginResult<()> {
        self.log.lock().unwrap().push(format!("process:{}", self.name));
        Ok(())
    }
}

/// Catalog with a recording factory for each name.
pub(crate) fn recording_catalog(names: &[&str]) -> (PluginCatalog, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut catalog = PluginCatalog::new();
    for name in names {
        let log = Arc::clone(&log);
        catalog.register(
            *name,
            plugin_factory(move |ctx: &PluginContext| {
                log.lock().unwrap().push(format!("new:{}", ctx.name));
                Ok(Recorder {
                    name: ctx.name.clone(),
                    log: Arc::clone(&log),
                })
            }),
        );
    }
    (catalog, log)
}

/// Create a plugin package at `root/rel` with the given manifest.
pub(crate) fn package(root: &Path, rel: &str, manifest: &str) -> PathBuf {
    let dir = root.join(rel);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(PLUGIN_MANIFEST_FILE), manifest).unwrap();
    dir
}

/// Number of log entries equal to `entry`.
pub(crate) fn count(log: &CallLog, entry: &str) -> usize {
    log.lock().unwrap().iter().filter(|e| *e == entry).count()
}

/// A registered plugin graph built on disk.
pub(crate) struct Graph {
    pub(crate) _dir: TempDir,
    pub(crate) registry: PluginRegistry,
    pub(crate) dependencies: DependencyMap,
    pub(crate) log: CallLog,
}

/// Build a registry from `(package dir, plugin name, dependency file)`
/// specs. An empty dependency string writes no file.
///
/// Packages are discovered in directory-name order, so the directory names
/// control registration order.
pub(crate) fn graph(specs: &[(&str, &str, &str)]) -> Graph {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = specs.iter().map(|(_, name, _)| *name).collect();
    for (rel, name, deps) in specs {
        let package_dir = package(
            dir.path(),
            rel,
            &format!("version = \"1.0\"\nexports = [\"{name}\"]\n"),
        );
        if !deps.is_empty() {
            std::fs::write(package_dir.join(DEPENDENCY_FILE), deps).unwrap();
        }
    }

    let (catalog, log) = recording_catalog(&names);
    let discovered = discover(Some(dir.path()), PLUGIN_MANIFEST_FILE).unwrap();
    let loaded = load_modules(&discovered, &catalog);
    let mut registry =
        register_modules(&loaded, &catalog, &HookMap::empty(), &PluginSettings::new());
    let dependencies = collect_dependencies(&mut registry).unwrap();

    Graph {
        _dir: dir,
        registry,
        dependencies,
        log,
    }
}
