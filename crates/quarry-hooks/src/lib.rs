//! Quarry Hooks - observer units that plugins can notify by name.
//!
//! Hooks are packaged like plugins (a directory with a `hook.toml`
//! manifest, honoring `IGNORE` markers) but are simpler: there is no
//! dependency concept, each instance is built exactly once, and instances
//! are keyed by their package directory name rather than their type name.
//!
//! The [`HookManager`] discovers, loads and constructs hooks, producing an
//! immutable [`HookMap`] that is handed to every plugin.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_hooks::prelude::*;
//!
//! let catalog = HookCatalog::new().with("JsonExporter", hook_factory(JsonExporter::new));
//! let hooks = HookManager::new(catalog).load(Some(Path::new("hooks")))?;
//!
//! hooks.trigger("json", &serde_json::json!({"host": "10.0.0.1"}))?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod hook;
pub mod manager;
pub mod map;

pub use error::{HookError, HookResult};
pub use hook::{HOOK_MANIFEST_FILE, Hook, HookCatalog, HookContext, HookFactory, hook_factory};
pub use manager::HookManager;
pub use map::{HookMap, HookRecord};
