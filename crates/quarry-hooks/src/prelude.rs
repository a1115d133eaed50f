//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quarry_hooks::prelude::*;` to import all essential types.

// Hook contract
pub use crate::{Hook, HookContext, HookFactory, hook_factory};

// Registry
pub use crate::{HookCatalog, HookManager, HookMap};

// Errors
pub use crate::{HookError, HookResult};
