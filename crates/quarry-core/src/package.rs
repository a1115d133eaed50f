//! Loading a discovered package against a factory catalog.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{LoadError, LoadResult};
use crate::manifest::PackageManifest;

/// A package whose manifest parsed and whose exports all have factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPackage {
    /// Discovery name (directory basename).
    pub name: String,
    /// Directory holding the package.
    pub directory: PathBuf,
    /// Path to the manifest that was loaded.
    pub manifest_path: PathBuf,
    /// Resolved version string.
    pub version: String,
    /// Optional description from the manifest.
    pub description: Option<String>,
    /// Exported capability types, in declaration order.
    pub exports: Vec<String>,
}

/// Load the package in `directory`.
///
/// Reads `directory/<entry_file>`, resolves the version and checks every
/// export against `catalog`.
///
/// # Errors
///
/// Returns a [`LoadError`] describing why this package cannot be used.
/// Callers treat it as scoped to this package.
pub fn load_package<F>(
    name: &str,
    directory: &Path,
    entry_file: &str,
    catalog: &Catalog<F>,
) -> LoadResult<LoadedPackage> {
    let manifest_path = directory.join(entry_file);
    let manifest = PackageManifest::load(&manifest_path)?;
    let version = manifest.resolve_version(name, directory)?;

    if let Some(unknown) = manifest
        .exports
        .iter()
        .find(|export| !catalog.contains(export))
    {
        return Err(LoadError::UnknownExport {
            name: name.to_string(),
            export: unknown.clone(),
        });
    }

    debug!(
        name,
        path = %manifest_path.display(),
        exports = ?manifest.exports,
        "Loaded package manifest"
    );

    Ok(LoadedPackage {
        name: name.to_string(),
        directory: directory.to_path_buf(),
        manifest_path,
        version,
        description: manifest.description,
        exports: manifest.exports,
    })
}
