//! Discovery and load error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort discovery of a package tree.
///
/// These are run-level failures: a root that cannot be walked means the
/// whole batch of packages underneath it is unknown.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery root does not exist.
    #[error("directory {path} not found")]
    RootNotFound {
        /// The missing root.
        path: PathBuf,
    },

    /// The discovery root exists but is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A directory inside the tree could not be read.
    #[error("failed to read directory {path}: {message}")]
    DirectoryReadFailed {
        /// The path that failed.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors that prevent a single package from loading.
///
/// Load errors are scoped to one package; callers log them and carry on
/// with the rest of the batch.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The manifest file is missing.
    #[error("package file not found: {path}")]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The manifest could not be read (permissions, I/O).
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or has the wrong shape.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path to the manifest.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Neither the manifest nor a `VERSION` file declares a version.
    #[error("package {name} does not declare a version")]
    MissingVersion {
        /// Package name.
        name: String,
    },

    /// The manifest exports a type that no factory is registered for.
    #[error("package {name} exports unknown type {export}")]
    UnknownExport {
        /// Package name.
        name: String,
        /// The export with no registered factory.
        export: String,
    },
}

impl LoadError {
    /// Build a load error from an I/O failure on `path`.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Result type for package loading.
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = LoadError::from_io(
            "/missing/plugin.toml",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_from_io_permission_denied() {
        let err = LoadError::from_io(
            "/locked/plugin.toml",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/locked/plugin.toml"));
    }
}
