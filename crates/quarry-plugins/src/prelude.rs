//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quarry_plugins::prelude::*;` to import all essential types.

// Plugin contract
pub use crate::{
    Plugin, PluginContext, PluginFactory, PluginOutput, PluginSettings, plugin_factory,
};

// Phases
pub use crate::{
    PLUGIN_MANIFEST_FILE, collect_dependencies, load_modules, register_modules,
    resolve_dependencies, topological_sort,
};

// Phase outputs
pub use crate::{
    DependencyMap, ExecutionOrder, LoadedModules, PluginCatalog, PluginRecord, PluginRegistry,
    Resolution,
};

// Errors
pub use crate::{PluginError, PluginResult, RegistrationError};
