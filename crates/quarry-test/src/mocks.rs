//! Mock plugins and hooks for testing.
//!
//! Every mock writes what happens to it into a shared [`CallLog`] so tests
//! can assert construction counts and call order across a whole run. Entries
//! look like `new:A`, `execute:A`, `process:A` and `hook:json`.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use quarry_hooks::{Hook, HookCatalog, HookContext, HookError, HookResult, hook_factory};
use quarry_plugins::{
    Plugin, PluginCatalog, PluginContext, PluginError, PluginOutput, PluginResult,
    plugin_factory,
};

/// Shared, ordered record of mock activity.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Panics
    ///
    /// Panics if the log's mutex is poisoned.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().expect("call log poisoned").push(entry.into());
    }

    /// Snapshot of all entries.
    ///
    /// # Panics
    ///
    /// Panics if the log's mutex is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("call log poisoned").clone()
    }

    /// Entries with the given prefix (e.g. `"execute:"`), prefix stripped.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix(prefix).map(String::from))
            .collect()
    }

    /// Number of entries equal to `entry`.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    /// Index of the first entry equal to `entry`.
    #[must_use]
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }
}

/// Plugin that records its calls and optionally triggers a hook from
/// `process_results`.
#[derive(Debug)]
pub struct RecordingPlugin {
    context: PluginContext,
    log: CallLog,
    hook: Option<String>,
}

impl RecordingPlugin {
    /// Create a recording plugin.
    #[must_use]
    pub fn new(context: &PluginContext, log: &CallLog) -> Self {
        log.push(format!("new:{}", context.name));
        Self {
            context: context.clone(),
            log: log.clone(),
            hook: None,
        }
    }

    /// Trigger `hook` with the execute output from `process_results`.
    #[must_use]
    pub fn triggering(mut self, hook: impl Into<String>) -> Self {
        self.hook = Some(hook.into());
        self
    }
}

impl Plugin for RecordingPlugin {
    fn execute(&mut self) -> PluginResult<PluginOutput> {
        self.log.push(format!("execute:{}", self.context.name));
        Ok(json!({ "plugin": self.context.name }))
    }

    fn process_results(&mut self, output: PluginOutput) -> PluginResult<()> {
        self.log.push(format!("process:{}", self.context.name));
        if let Some(hook) = &self.hook {
            self.context.trigger(hook, &output)?;
        }
        Ok(())
    }
}

/// Which call a [`FailingPlugin`] fails in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// Fail in `execute`.
    Execute,
    /// Fail in `process_results`.
    ProcessResults,
}

/// Plugin that records its calls and fails at a chosen point.
#[derive(Debug)]
pub struct FailingPlugin {
    name: String,
    log: CallLog,
    fail_at: FailAt,
}

impl FailingPlugin {
    /// Create a failing plugin.
    #[must_use]
    pub fn new(context: &PluginContext, log: &CallLog, fail_at: FailAt) -> Self {
        log.push(format!("new:{}", context.name));
        Self {
            name: context.name.clone(),
            log: log.clone(),
            fail_at,
        }
    }
}

impl Plugin for FailingPlugin {
    fn execute(&mut self) -> PluginResult<PluginOutput> {
        self.log.push(format!("execute:{}", self.name));
        if self.fail_at == FailAt::Execute {
            return Err(PluginError::Execution(format!("{} failed to execute", self.name)));
        }
        Ok(Value::Null)
    }

    fn process_results(&mut self, _output: PluginOutput) -> PluginResult<()> {
        self.log.push(format!("process:{}", self.name));
        if self.fail_at == FailAt::ProcessResults {
            return Err(PluginError::Execution(format!(
                "{} failed to process results",
                self.name
            )));
        }
        Ok(())
    }
}

/// Hook that records every trigger and its payload.
///
/// Each trigger logs `hook:<name>` followed by `payload:<name>:<json>`.
#[derive(Debug)]
pub struct RecordingHook {
    name: String,
    log: CallLog,
}

impl RecordingHook {
    /// Create a recording hook named after its package.
    #[must_use]
    pub fn new(context: &HookContext, log: &CallLog) -> Self {
        Self {
            name: context.name.clone(),
            log: log.clone(),
        }
    }
}

impl Hook for RecordingHook {
    fn trigger(&self, payload: &Value) -> HookResult<()> {
        self.log.push(format!("hook:{}", self.name));
        self.log.push(format!("payload:{}:{payload}", self.name));
        Ok(())
    }
}

/// Hook whose trigger always fails.
#[derive(Debug)]
pub struct FailingHook {
    name: String,
}

impl Hook for FailingHook {
    fn trigger(&self, _payload: &Value) -> HookResult<()> {
        Err(HookError::Trigger {
            hook: self.name.clone(),
            message: "output unavailable".to_string(),
        })
    }
}

/// Catalog with a [`RecordingPlugin`] factory for each name.
#[must_use]
pub fn recording_plugins(log: &CallLog, names: &[&str]) -> PluginCatalog {
    let mut catalog = PluginCatalog::new();
    for name in names {
        let log = log.clone();
        catalog.register(
            *name,
            plugin_factory(move |ctx: &PluginContext| Ok(RecordingPlugin::new(ctx, &log))),
        );
    }
    catalog
}

/// Register a [`FailingPlugin`] factory under `name`.
pub fn add_failing_plugin(catalog: &mut PluginCatalog, log: &CallLog, name: &str, fail_at: FailAt) {
    let log = log.clone();
    catalog.register(
        name,
        plugin_factory(move |ctx: &PluginContext| Ok(FailingPlugin::new(ctx, &log, fail_at))),
    );
}

/// Register a [`RecordingPlugin`] factory under `name` that triggers `hook`.
pub fn add_triggering_plugin(catalog: &mut PluginCatalog, log: &CallLog, name: &str, hook: &str) {
    let log = log.clone();
    let hook = hook.to_string();
    catalog.register(
        name,
        plugin_factory(move |ctx: &PluginContext| {
            Ok(RecordingPlugin::new(ctx, &log).triggering(hook.clone()))
        }),
    );
}

/// Catalog with a [`RecordingHook`] factory for each type name.
#[must_use]
pub fn recording_hooks(log: &CallLog, names: &[&str]) -> HookCatalog {
    let mut catalog = HookCatalog::new();
    for name in names {
        let log = log.clone();
        catalog.register(
            *name,
            hook_factory(move |ctx: &HookContext| Ok(RecordingHook::new(ctx, &log))),
        );
    }
    catalog
}

/// Catalog with a [`FailingHook`] factory for each type name.
#[must_use]
pub fn failing_hooks(names: &[&str]) -> HookCatalog {
    let mut catalog = HookCatalog::new();
    for name in names {
        catalog.register(
            *name,
            hook_factory(|ctx: &HookContext| {
                Ok(FailingHook {
                    name: ctx.name.clone(),
                })
            }),
        );
    }
    catalog
}
