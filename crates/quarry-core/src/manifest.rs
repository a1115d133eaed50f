//! Package manifest types.
//!
//! The manifest is the package's entry file (`plugin.toml` / `hook.toml`).
//! It declares the package version and the capability types it exports:
//!
//! ```toml
//! version = "1.0.0"
//! description = "ARP sweep of the local segment"
//! exports = ["ArpScanner"]
//! ```
//!
//! When `version` is omitted the sibling [`VERSION_FILE`] is consulted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// Fallback file holding a package's version string.
pub const VERSION_FILE: &str = "VERSION";

/// A package manifest loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    /// Declared version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Capability types exported by the package, in declaration order.
    #[serde(default)]
    pub exports: Vec<String>,
}

impl PackageManifest {
    /// Load a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] / [`LoadError::Io`] if the file
    /// cannot be read and [`LoadError::Parse`] if it is not a valid manifest.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;

        toml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve the package version.
    ///
    /// Uses the manifest's `version` when present and non-blank, otherwise
    /// the trimmed content of `VERSION` in `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingVersion`] when neither source declares a
    /// version, or [`LoadError::Io`] if the `VERSION` file exists but
    /// cannot be read.
    pub fn resolve_version(&self, name: &str, directory: &Path) -> LoadResult<String> {
        if let Some(version) = self.version.as_deref().map(str::trim)
            && !version.is_empty()
        {
            return Ok(version.to_string());
        }

        let version_path = directory.join(VERSION_FILE);
        let content = match std::fs::read_to_string(&version_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::MissingVersion {
                    name: name.to_string(),
                });
            },
            Err(e) => return Err(LoadError::from_io(version_path, e)),
        };

        let version = content.trim();
        if version.is_empty() {
            return Err(LoadError::MissingVersion {
                name: name.to_string(),
            });
        }
        Ok(version.to_string())
    }
}
