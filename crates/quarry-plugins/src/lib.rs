//! Quarry Plugins - loading, registration and ordering of plugins.
//!
//! This crate covers every plugin phase of an orchestration run except the
//! execution loop itself:
//!
//! - [`load_modules`] turns discovered `plugin.toml` packages into loaded
//!   modules, dropping packages that fail to load.
//! - [`register_modules`] builds one [`PluginRecord`] per exported type
//!   through the [`PluginCatalog`].
//! - [`collect_dependencies`] reads each plugin's `DEPENDENCY` file.
//! - [`resolve_dependencies`] activates plugins whose dependencies are
//!   registered and resolved.
//! - [`topological_sort`] produces the execution order.
//!
//! Each phase takes the previous phase's output and returns a new value, so
//! phases can be exercised in isolation.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_plugins::prelude::*;
//!
//! let discovered = quarry_core::discover(Some(root), PLUGIN_MANIFEST_FILE)?;
//! let loaded = load_modules(&discovered, &catalog);
//! let mut registry = register_modules(&loaded, &catalog, &hooks, &settings);
//! let dependencies = collect_dependencies(&mut registry)?;
//! let resolution = resolve_dependencies(&mut registry, &dependencies);
//! let order = topological_sort(&registry, &dependencies, &resolution);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod dependency;
pub mod error;
pub mod loader;
pub mod plugin;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod sorter;

#[cfg(test)]
mod testing;

pub use dependency::{
    DEPENDENCY_FILE, DependencyMap, collect_dependencies, parse_dependencies, read_dependencies,
};
pub use error::{
    DependencyError, DependencyResult, PluginError, PluginResult, RegistrationError,
};
pub use loader::{LoadedModules, PLUGIN_MANIFEST_FILE, load_modules};
pub use plugin::{
    Plugin, PluginCatalog, PluginContext, PluginFactory, PluginOutput, PluginSettings,
    plugin_factory,
};
pub use record::PluginRecord;
pub use registry::{PluginRegistry, register_modules};
pub use resolver::{Resolution, resolve_dependencies};
pub use sorter::{ExecutionOrder, topological_sort};
