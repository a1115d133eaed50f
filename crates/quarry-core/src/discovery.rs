//! Package discovery - find package directories under a root.
//!
//! A directory is a package when it contains the entry file for the unit
//! kind being discovered (`plugin.toml` for plugins, `hook.toml` for hooks).
//! A directory containing an [`EXCLUDE_MARKER`] file is skipped together
//! with everything beneath it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{DiscoveryError, DiscoveryResult};

/// Sentinel file that excludes a directory subtree from discovery.
pub const EXCLUDE_MARKER: &str = "IGNORE";

/// A package found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredUnit {
    /// Package name: the basename of its directory.
    pub name: String,
    /// Directory holding the package.
    pub directory: PathBuf,
}

/// Insertion-ordered name → directory map produced by [`discover`].
///
/// Re-inserting an existing name keeps the original position and replaces
/// the directory, so the last package seen under a basename wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredUnits {
    units: Vec<DiscoveredUnit>,
    index: HashMap<String, usize>,
}

impl DiscoveredUnits {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name → directory`, returning the directory it replaced.
    pub fn insert(&mut self, name: impl Into<String>, directory: PathBuf) -> Option<PathBuf> {
        let name = name.into();
        if let Some(&slot) = self.index.get(&name) {
            let unit = self.units.get_mut(slot)?;
            return Some(std::mem::replace(&mut unit.directory, directory));
        }
        self.index.insert(name.clone(), self.units.len());
        self.units.push(DiscoveredUnit { name, directory });
        None
    }

    /// Directory recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.index
            .get(name)
            .and_then(|&slot| self.units.get(slot))
            .map(|unit| unit.directory.as_path())
    }

    /// Iterate in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredUnit> {
        self.units.iter()
    }

    /// Package names in discovery order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name.as_str()).collect()
    }

    /// Number of discovered packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a> IntoIterator for &'a DiscoveredUnits {
    type Item = &'a DiscoveredUnit;
    type IntoIter = std::slice::Iter<'a, DiscoveredUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Discover packages under `root`.
///
/// A `None` root is a no-op that returns an empty map. The tree is walked
/// in file-name order so repeated runs over an unchanged tree produce the
/// same map.
///
/// # Errors
///
/// Returns a [`DiscoveryError`] if the root is missing, is not a
/// directory, or any directory in the tree cannot be read.
pub fn discover(root: Option<&Path>, entry_file: &str) -> DiscoveryResult<DiscoveredUnits> {
    let mut units = DiscoveredUnits::new();

    let Some(root) = root else {
        info!(entry_file, "No directory given, nothing to discover");
        return Ok(units);
    };

    if !root.exists() {
        return Err(DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    info!(path = %root.display(), entry_file, "Discovering packages");

    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| DiscoveryError::DirectoryReadFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        if dir.join(EXCLUDE_MARKER).is_file() {
            info!(path = %dir.display(), "Package ignored");
            walker.skip_current_dir();
            continue;
        }

        if dir.join(entry_file).is_file() {
            let name = package_name(dir);
            debug!(name = %name, path = %dir.display(), "Found package");
            if let Some(previous) = units.insert(name.clone(), dir.to_path_buf()) {
                warn!(
                    name = %name,
                    previous = %previous.display(),
                    replacement = %dir.display(),
                    "Package name discovered twice, keeping the later directory"
                );
            }
        }
    }

    debug!(packages = ?units.names(), "Discovered packages");
    Ok(units)
}

/// Basename of a package directory.
fn package_name(dir: &Path) -> String {
    dir.file_name().map_or_else(
        || dir.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    const ENTRY: &str = "plugin.toml";

    fn package(root: &Path, rel: &str) -> PathBuf {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(ENTRY), "version = \"1.0\"\n").unwrap();
        dir
    }

    #[test]
    fn test_discover_none_root() {
        let units = discover(None, ENTRY).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = discover(Some(missing.as_path()), ENTRY).unwrap_err();
        assert!(matches!(err, DiscoveryError::RootNotFound { .. }));
    }

    #[test]
    fn test_discover_root_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let err = discover(Some(file.as_path()), ENTRY).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotADirectory { .. }));
    }

    #[test]
    fn test_discover_nested_packages() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let ping = package(root, "scanners/ping");
        let json = package(root, "exporters/json");
        std::fs::create_dir_all(root.join("empty/deeper")).unwrap();
        std::fs::write(root.join("empty/deeper/notes.txt"), "x").unwrap();

        let units = discover(Some(root), ENTRY).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units.get("ping"), Some(ping.as_path()));
        assert_eq!(units.get("json"), Some(json.as_path()));
        assert!(units.get("empty").is_none());
        assert!(units.get("deeper").is_none());
    }

    #[test]
    fn test_discover_other_files_are_not_entries() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("arp");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hook.toml"), "").unwrap();
        std::fs::write(dir.join("VERSION"), "1.0").unwrap();

        let units = discover(Some(temp_dir.path()), ENTRY).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_discover_ignore_marker_with_entry() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let skipped = package(root, "scanners/test1");
        std::fs::write(skipped.join(EXCLUDE_MARKER), "").unwrap();
        package(root, "scanners/test2");

        let units = discover(Some(root), ENTRY).unwrap();
        assert_eq!(units.names(), vec!["test2"]);
    }

    #[test]
    fn test_discover_ignore_marker_excludes_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("vendor")).unwrap();
        std::fs::write(root.join("vendor").join(EXCLUDE_MARKER), "skip me").unwrap();
        package(root, "vendor/a");
        package(root, "vendor/a/b/c/d");
        package(root, "kept");

        let units = discover(Some(root), ENTRY).unwrap();
        assert_eq!(units.names(), vec!["kept"]);
    }

    #[test]
    fn test_discover_root_itself_is_package() {
        let temp_dir = TempDir::new().unwrap();
        let root = package(temp_dir.path(), "solo");
        let units = discover(Some(root.as_path()), ENTRY).unwrap();
        assert_eq!(units.names(), vec!["solo"]);
    }

    #[test]
    #[traced_test]
    fn test_discover_duplicate_basename_last_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        package(root, "a/json");
        let later = package(root, "b/json");

        let units = discover(Some(root), ENTRY).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units.get("json"), Some(later.as_path()));
        assert!(logs_contain(
            "Package name discovered twice, keeping the later directory"
        ));
    }

    #[test]
    fn test_discover_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        package(root, "users/plugin1");
        package(root, "users/plugin2");
        package(root, "core/args");

        let first = discover(Some(root), ENTRY).unwrap();
        let second = discover(Some(root), ENTRY).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.names(), vec!["args", "plugin1", "plugin2"]);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut units = DiscoveredUnits::new();
        units.insert("a", PathBuf::from("/one/a"));
        units.insert("b", PathBuf::from("/one/b"));
        let previous = units.insert("a", PathBuf::from("/two/a"));

        assert_eq!(previous, Some(PathBuf::from("/one/a")));
        assert_eq!(units.names(), vec!["a", "b"]);
        assert_eq!(units.get("a"), Some(Path::new("/two/a")));
    }
}
