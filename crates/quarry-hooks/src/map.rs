//! Immutable hook map shared with plugins.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{HookError, HookResult};
use crate::hook::Hook;

/// A constructed hook and where it came from.
#[derive(Clone)]
pub struct HookRecord {
    /// Registration key (package directory basename).
    pub name: String,
    /// Exported type the instance was built from.
    pub type_name: String,
    /// Package version.
    pub version: String,
    /// Package directory.
    pub directory: PathBuf,
    /// The live instance.
    pub instance: Arc<dyn Hook>,
}

impl fmt::Debug for HookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRecord")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("version", &self.version)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

/// Name → hook snapshot.
///
/// Cloning is cheap; every plugin of a run holds a clone of the same map.
#[derive(Clone, Default)]
pub struct HookMap {
    hooks: Arc<HashMap<String, HookRecord>>,
}

impl HookMap {
    /// A map with no hooks.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a map from records; a later record replaces an earlier one
    /// with the same name.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = HookRecord>) -> Self {
        let hooks = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self {
            hooks: Arc::new(hooks),
        }
    }

    /// Look up a hook instance by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Hook>> {
        self.hooks.get(name).map(|record| &record.instance)
    }

    /// Look up the full record for a hook.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&HookRecord> {
        self.hooks.get(name)
    }

    /// Whether a hook is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Invoke the hook registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::NotFound`] if no such hook exists, or whatever
    /// error the hook itself reports.
    pub fn trigger(&self, name: &str, payload: &serde_json::Value) -> HookResult<()> {
        let hook = self
            .get(name)
            .ok_or_else(|| HookError::NotFound(name.to_string()))?;
        debug!(hook = name, "Triggering hook");
        hook.trigger(payload)
    }

    /// Registered hook names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookMap")
            .field("hooks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collector(Mutex<Vec<serde_json::Value>>);

    impl Hook for Collector {
        fn trigger(&self, payload: &serde_json::Value) -> HookResult<()> {
            self.0.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Hook for Broken {
        fn trigger(&self, _payload: &serde_json::Value) -> HookResult<()> {
            Err(HookError::Trigger {
                hook: "broken".into(),
                message: "disk full".into(),
            })
        }
    }

    fn record(name: &str, instance: Arc<dyn Hook>) -> HookRecord {
        HookRecord {
            name: name.to_string(),
            type_name: "Collector".to_string(),
            version: "1.0".to_string(),
            directory: PathBuf::from("/hooks").join(name),
            instance,
        }
    }

    #[test]
    fn test_trigger_by_name() {
        let collector = Arc::new(Collector(Mutex::new(Vec::new())));
        let map = HookMap::from_records([record("json", collector.clone())]);

        map.trigger("json", &serde_json::json!({"port": 22})).unwrap();

        let seen = collector.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["port"], 22);
    }

    #[test]
    fn test_trigger_missing_hook() {
        let map = HookMap::empty();
        let err = map.trigger("json", &serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, HookError::NotFound(name) if name == "json"));
    }

    #[test]
    fn test_trigger_propagates_hook_error() {
        let map = HookMap::from_records([record("broken", Arc::new(Broken))]);
        let err = map.trigger("broken", &serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, HookError::Trigger { .. }));
    }

    #[test]
    fn test_clone_shares_instances() {
        let collector = Arc::new(Collector(Mutex::new(Vec::new())));
        let map = HookMap::from_records([record("json", collector.clone())]);
        let copy = map.clone();

        map.trigger("json", &serde_json::Value::Null).unwrap();
        copy.trigger("json", &serde_json::Value::Null).unwrap();

        assert_eq!(collector.0.lock().unwrap().len(), 2);
        assert_eq!(copy.names(), vec!["json"]);
    }
}
