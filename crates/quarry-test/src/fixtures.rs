//! On-disk package fixtures.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use quarry_core::{EXCLUDE_MARKER, VERSION_FILE};
use quarry_hooks::HOOK_MANIFEST_FILE;
use quarry_plugins::{DEPENDENCY_FILE, PLUGIN_MANIFEST_FILE};

/// Render a package manifest with a version and exports.
#[must_use]
pub fn manifest(version: &str, exports: &[&str]) -> String {
    let exports = exports
        .iter()
        .map(|export| format!("\"{export}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("version = \"{version}\"\nexports = [{exports}]\n")
}

/// A temporary directory tree of plugin and hook packages.
///
/// All paths are relative to the tree root. The tree is deleted when the
/// fixture is dropped.
///
/// # Panics
///
/// Every method panics if the filesystem operation fails.
#[derive(Debug)]
pub struct PackageTree {
    dir: TempDir,
}

impl PackageTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel`.
    #[must_use]
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directory");
        }
        std::fs::write(&path, content).expect("failed to write file");
        self
    }

    /// Create a plugin package at `rel` exporting `exports`, version 1.0.0.
    pub fn plugin(&self, rel: &str, exports: &[&str]) -> &Self {
        self.plugin_manifest(rel, &manifest("1.0.0", exports))
    }

    /// Create a plugin package at `rel` with a raw manifest.
    pub fn plugin_manifest(&self, rel: &str, content: &str) -> &Self {
        self.file(&format!("{rel}/{PLUGIN_MANIFEST_FILE}"), content)
    }

    /// Create a hook package at `rel` exporting `exports`, version 1.0.0.
    pub fn hook(&self, rel: &str, exports: &[&str]) -> &Self {
        self.file(
            &format!("{rel}/{HOOK_MANIFEST_FILE}"),
            &manifest("1.0.0", exports),
        )
    }

    /// Declare the dependencies of the package at `rel`.
    pub fn depends(&self, rel: &str, dependencies: &[&str]) -> &Self {
        self.dependency_file(rel, &dependencies.join("\n"))
    }

    /// Write raw dependency file contents for the package at `rel`.
    pub fn dependency_file(&self, rel: &str, content: &str) -> &Self {
        self.file(&format!("{rel}/{DEPENDENCY_FILE}"), content)
    }

    /// Write a version file for the package at `rel`.
    pub fn version_file(&self, rel: &str, version: &str) -> &Self {
        self.file(&format!("{rel}/{VERSION_FILE}"), version)
    }

    /// Exclude the subtree at `rel` from discovery.
    pub fn ignore(&self, rel: &str) -> &Self {
        self.file(&format!("{rel}/{EXCLUDE_MARKER}"), "")
    }
}

impl Default for PackageTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_rendering() {
        assert_eq!(
            manifest("2.1", &["A", "B"]),
            "version = \"2.1\"\nexports = [\"A\", \"B\"]\n"
        );
        assert_eq!(manifest("1", &[]), "version = \"1\"\nexports = []\n");
    }

    #[test]
    fn test_tree_layout() {
        let tree = PackageTree::new();
        tree.plugin("core/args", &["Args"])
            .depends("core/args", &["Base"])
            .ignore("core/old")
            .hook("json", &["JsonExporter"]);

        assert!(tree.path("core/args/plugin.toml").is_file());
        assert_eq!(
            std::fs::read_to_string(tree.path("core/args/DEPENDENCY")).unwrap(),
            "Base"
        );
        assert!(tree.path("core/old/IGNORE").is_file());
        assert!(tree.path("json/hook.toml").is_file());
    }
}
