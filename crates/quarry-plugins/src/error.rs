//! Plugin error types.

use std::path::PathBuf;

use quarry_hooks::HookError;

/// Errors raised by plugins themselves.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin's work failed.
    #[error("plugin execution failed: {0}")]
    Execution(String),

    /// A setting the plugin needs is missing or malformed.
    #[error("invalid plugin setting {key}: {message}")]
    InvalidSetting {
        /// Setting key.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// A hook the plugin triggered failed.
    #[error("hook error: {0}")]
    Hook(#[from] HookError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that keep a loaded module's types from being registered.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The module has no usable source directory.
    #[error("module file path not found for module: {module}")]
    MissingDirectory {
        /// Module (package) name.
        module: String,
    },

    /// The factory for an exported type failed.
    #[error("failed to construct plugin {plugin}: {source}")]
    Construction {
        /// Exported type name.
        plugin: String,
        /// Error reported by the factory.
        #[source]
        source: PluginError,
    },

    /// An exported type has no factory (catalog changed after loading).
    #[error("no factory registered for plugin {plugin}")]
    MissingFactory {
        /// Exported type name.
        plugin: String,
    },
}

/// Errors encountered while collecting or checking dependencies.
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    /// The dependency file exists but cannot be read.
    #[error("failed to read dependency file {path}: {source}")]
    Read {
        /// Path to the dependency file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A plugin names dependencies that were never registered.
    #[error("plugin {plugin} has unregistered dependencies: {missing:?}")]
    Unregistered {
        /// The dependent plugin.
        plugin: String,
        /// Dependency names with no registered plugin.
        missing: Vec<String>,
    },
}

/// Result type for dependency operations.
pub type DependencyResult<T> = Result<T, DependencyError>;
