//! Dependency declarations.
//!
//! A plugin declares what it depends on in a `DEPENDENCY` file placed in
//! its package directory: one plugin name per line. Names refer to
//! registered plugin names, not package names.

use std::io;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{error, info};

use crate::error::{DependencyError, DependencyResult};
use crate::registry::PluginRegistry;

/// Name of the dependency declaration file.
pub const DEPENDENCY_FILE: &str = "DEPENDENCY";

/// Declared dependencies per plugin, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    entries: Vec<(String, Vec<String>)>,
}

impl DependencyMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a plugin's dependencies, keeping its original position if it
    /// was already present.
    pub fn insert(&mut self, plugin: impl Into<String>, dependencies: Vec<String>) {
        let plugin = plugin.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == plugin) {
            entry.1 = dependencies;
        } else {
            self.entries.push((plugin, dependencies));
        }
    }

    /// Dependencies of one plugin.
    #[must_use]
    pub fn get(&self, plugin: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == plugin)
            .map(|(_, deps)| deps.as_slice())
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.as_slice()))
    }

    /// Plugin names in insertion order.
    #[must_use]
    pub fn plugins(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of plugins in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (plugin, deps) in iter {
            map.insert(plugin, deps);
        }
        map
    }
}

impl Serialize for DependencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (plugin, deps) in &self.entries {
            map.serialize_entry(plugin, deps)?;
        }
        map.end()
    }
}

/// Parse dependency file contents.
///
/// Surrounding whitespace is stripped, each line is trimmed and blank lines
/// are dropped. Names are kept in declaration order, duplicates included.
#[must_use]
pub fn parse_dependencies(content: &str) -> Vec<String> {
    content
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read the dependency file in `directory`.
///
/// A missing file means no dependencies.
///
/// # Errors
///
/// Returns [`DependencyError::Read`] if the file exists but cannot be read.
pub fn read_dependencies(directory: &Path) -> DependencyResult<Vec<String>> {
    let path = directory.join(DEPENDENCY_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(parse_dependencies(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(DependencyError::Read { path, source }),
    }
}

/// Read every registered plugin's dependency file.
///
/// The declarations are attached to each record and returned as a map.
///
/// # Errors
///
/// Returns [`DependencyError::Read`] for the first dependency file that
/// exists but cannot be read.
pub fn collect_dependencies(registry: &mut PluginRegistry) -> DependencyResult<DependencyMap> {
    let mut map = DependencyMap::new();

    for record in registry.iter_mut() {
        let dependencies = read_dependencies(record.source_directory()).inspect_err(|e| {
            error!(plugin = %record.name(), error = %e, "Cannot read dependency file");
        })?;

        if dependencies.is_empty() {
            info!(plugin = %record.name(), "Dependencies for plugin: Not Found");
        } else {
            info!(plugin = %record.name(), dependencies = ?dependencies, "Dependencies for plugin");
        }

        record.set_dependencies(dependencies.clone());
        map.insert(record.name(), dependencies);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{PLUGIN_MANIFEST_FILE, load_modules};
    use crate::plugin::PluginSettings;
    use crate::registry::register_modules;
    use crate::testing::{package, recording_catalog};
    use quarry_core::discover;
    use quarry_hooks::HookMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_dependencies() {
        assert_eq!(parse_dependencies("A\nB\n"), vec!["A", "B"]);
        assert_eq!(parse_dependencies("  \n A \n\n\tB\t\n  "), vec!["A", "B"]);
        assert!(parse_dependencies("").is_empty());
        assert!(parse_dependencies(" \n\n ").is_empty());
        assert_eq!(parse_dependencies("A\nA"), vec!["A", "A"]);
    }

    #[test]
    fn test_read_dependencies_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_dependencies(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_read_dependencies_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(DEPENDENCY_FILE)).unwrap();

        let err = read_dependencies(temp_dir.path()).unwrap_err();
        assert!(matches!(err, DependencyError::Read { .. }));
    }

    #[test]
    fn test_collect_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dir = package(root, "b", "version = \"1.0\"\nexports = [\"B\"]\n");
        std::fs::write(dir.join(DEPENDENCY_FILE), "A\n").unwrap();
        package(root, "a", "version = \"1.0\"\nexports = [\"A\"]\n");

        let (catalog, _log) = recording_catalog(&["A", "B"]);
        let discovered = discover(Some(root), PLUGIN_MANIFEST_FILE).unwrap();
        let loaded = load_modules(&discovered, &catalog);
        let mut registry =
            register_modules(&loaded, &catalog, &HookMap::empty(), &PluginSettings::new());

        let deps = collect_dependencies(&mut registry).unwrap();

        assert_eq!(deps.plugins(), vec!["A", "B"]);
        assert_eq!(deps.get("B").unwrap(), ["A".to_string()]);
        assert!(deps.get("A").unwrap().is_empty());
        assert_eq!(registry.get("B").unwrap().dependencies(), ["A".to_string()]);
    }

    #[test]
    fn test_collect_dependencies_unreadable_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dir = package(root, "b", "version = \"1.0\"\nexports = [\"B\"]\n");
        std::fs::write(dir.join(DEPENDENCY_FILE), b"A\n\xff\xfe\n").unwrap();
        package(root, "a", "version = \"1.0\"\nexports = [\"A\"]\n");

        let (catalog, _log) = recording_catalog(&["A", "B"]);
        let discovered = discover(Some(root), PLUGIN_MANIFEST_FILE).unwrap();
        let loaded = load_modules(&discovered, &catalog);
        let mut registry =
            register_modules(&loaded, &catalog, &HookMap::empty(), &PluginSettings::new());

        let err = collect_dependencies(&mut registry).unwrap_err();
        assert!(matches!(
            err,
            DependencyError::Read { ref path, .. } if path == &dir.join(DEPENDENCY_FILE)
        ));
    }

    #[test]
    fn test_dependency_map_serializes_in_order() {
        let map: DependencyMap = [
            ("Z".to_string(), vec!["A".to_string()]),
            ("A".to_string(), Vec::new()),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Z":["A"],"A":[]}"#);
    }
}
