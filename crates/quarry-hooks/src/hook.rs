//! Hook capability contract and factories.

use std::path::PathBuf;
use std::sync::Arc;

use quarry_core::Catalog;

use crate::error::HookResult;

/// Entry file that marks a directory as a hook package.
pub const HOOK_MANIFEST_FILE: &str = "hook.toml";

/// An observer that plugins notify by name.
///
/// Hooks are shared between every plugin of a run, so they take `&self`
/// and must be `Send + Sync`. Use interior mutability for state.
pub trait Hook: Send + Sync {
    /// React to an event emitted by a plugin.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::HookError`] if the hook cannot handle the event.
    fn trigger(&self, payload: &serde_json::Value) -> HookResult<()>;
}

/// Construction context handed to a hook factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    /// Name the hook is registered under (package directory basename).
    pub name: String,
    /// Exported type name being constructed.
    pub type_name: String,
    /// Package directory, for hooks that ship data files.
    pub directory: PathBuf,
}

/// Factory that builds one hook instance.
pub type HookFactory = Arc<dyn Fn(&HookContext) -> HookResult<Arc<dyn Hook>> + Send + Sync>;

/// Catalog of hook factories keyed by exported type name.
pub type HookCatalog = Catalog<HookFactory>;

/// Wrap a typed constructor into a [`HookFactory`].
///
/// ```rust,ignore
/// catalog.register("JsonExporter", hook_factory(JsonExporter::new));
/// ```
pub fn hook_factory<H, F>(constructor: F) -> HookFactory
where
    H: Hook + 'static,
    F: Fn(&HookContext) -> HookResult<H> + Send + Sync + 'static,
{
    Arc::new(move |ctx| constructor(ctx).map(|hook| Arc::new(hook) as Arc<dyn Hook>))
}
