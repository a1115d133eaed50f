//! Plugin capability contract, construction context and factories.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use quarry_core::Catalog;
use quarry_hooks::HookMap;

use crate::error::{PluginError, PluginResult};

/// Value produced by [`Plugin::execute`] and handed to
/// [`Plugin::process_results`].
pub type PluginOutput = serde_json::Value;

/// A unit of work run by the orchestrator.
///
/// Construction must be cheap and side-effect free; [`Plugin::execute`]
/// is the only entry point that performs real work. Failures are reported
/// through the returned `Result`.
pub trait Plugin: Send {
    /// Perform the plugin's work.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the work fails.
    fn execute(&mut self) -> PluginResult<PluginOutput>;

    /// Post-process the value returned by [`Plugin::execute`].
    ///
    /// This is where plugins usually notify hooks.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if processing or a hook fails.
    fn process_results(&mut self, output: PluginOutput) -> PluginResult<()>;
}

/// Free-form settings passed to every plugin of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginSettings(BTreeMap<String, String>);

impl PluginSettings {
    /// Empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a setting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a setting.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a required setting.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidSetting`] if the key is absent.
    pub fn require(&self, key: &str) -> PluginResult<&str> {
        self.get(key).ok_or_else(|| PluginError::InvalidSetting {
            key: key.to_string(),
            message: "setting is required".to_string(),
        })
    }

    /// Iterate over settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether no settings are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for PluginSettings {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Everything a plugin factory receives.
///
/// The same context is used for the registration-time instance and for the
/// fresh instance built when the plugin's dependencies resolve.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Plugin name (the exported type name).
    pub name: String,
    /// Package directory the plugin was loaded from.
    pub directory: PathBuf,
    /// Hooks the plugin may trigger.
    pub hooks: HookMap,
    /// Run-wide settings.
    pub settings: PluginSettings,
}

impl PluginContext {
    /// Trigger a hook by name, converting hook failures to plugin errors.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Hook`] if the hook is missing or fails.
    pub fn trigger(&self, hook: &str, payload: &serde_json::Value) -> PluginResult<()> {
        self.hooks.trigger(hook, payload).map_err(PluginError::from)
    }
}

/// Factory that builds one plugin instance.
pub type PluginFactory =
    Arc<dyn Fn(&PluginContext) -> PluginResult<Box<dyn Plugin>> + Send + Sync>;

/// Catalog of plugin factories keyed by exported type name.
pub type PluginCatalog = Catalog<PluginFactory>;

/// Wrap a typed constructor into a [`PluginFactory`].
///
/// ```rust,ignore
/// catalog.register("PingScanner", plugin_factory(PingScanner::new));
/// ```
pub fn plugin_factory<P, F>(constructor: F) -> PluginFactory
where
    P: Plugin + 'static,
    F: Fn(&PluginContext) -> PluginResult<P> + Send + Sync + 'static,
{
    Arc::new(move |ctx| constructor(ctx).map(|plugin| Box::new(plugin) as Box<dyn Plugin>))
}
