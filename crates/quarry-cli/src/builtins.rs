//! Plugins and hooks compiled into the `quarry` binary.
//!
//! Packages on disk name these types in their `exports`; the catalogs built
//! here are what the loader checks those names against.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use quarry_hooks::{Hook, HookCatalog, HookContext, HookError, HookResult, hook_factory};
use quarry_plugins::{
    Plugin, PluginCatalog, PluginContext, PluginOutput, PluginResult, plugin_factory,
};

/// Hook the `Test` plugin reports to.
pub(crate) const JSON_HOOK: &str = "json";

/// Catalog of the built-in plugin types.
pub(crate) fn plugin_catalog() -> PluginCatalog {
    PluginCatalog::new()
        .with("Args", plugin_factory(Args::new))
        .with("Test", plugin_factory(Test::new))
}

/// Catalog of the built-in hook types.
///
/// `output` is where `JsonExporter` appends its lines; without it payloads
/// go to the log.
pub(crate) fn hook_catalog(output: Option<PathBuf>) -> HookCatalog {
    HookCatalog::new().with(
        "JsonExporter",
        hook_factory(move |ctx: &HookContext| Ok(JsonExporter::new(ctx, output.clone()))),
    )
}

/// Reports the run-wide settings it was built with.
#[derive(Debug)]
pub(crate) struct Args {
    context: PluginContext,
}

impl Args {
    fn new(context: &PluginContext) -> PluginResult<Self> {
        Ok(Self {
            context: context.clone(),
        })
    }
}

impl Plugin for Args {
    fn execute(&mut self) -> PluginResult<PluginOutput> {
        info!(plugin = %self.context.name, "Executing Args plugin...");
        let settings: Map<String, Value> = self
            .context
            .settings
            .iter()
            .map(|(key, value)| (key.to_owned(), Value::String(value.to_owned())))
            .collect();
        Ok(json!({
            "plugin": self.context.name,
            "settings": settings,
        }))
    }

    fn process_results(&mut self, output: PluginOutput) -> PluginResult<()> {
        info!(
            plugin = %self.context.name,
            settings = %output["settings"],
            "Processing results for Args plugin"
        );
        Ok(())
    }
}

/// Sends its result to the `json` hook.
#[derive(Debug)]
pub(crate) struct Test {
    context: PluginContext,
}

impl Test {
    fn new(context: &PluginContext) -> PluginResult<Self> {
        Ok(Self {
            context: context.clone(),
        })
    }
}

impl Plugin for Test {
    fn execute(&mut self) -> PluginResult<PluginOutput> {
        info!(plugin = %self.context.name, "Executing plugin");
        Ok(json!({
            "plugin": self.context.name,
            "directory": self.context.directory.display().to_string(),
        }))
    }

    fn process_results(&mut self, output: PluginOutput) -> PluginResult<()> {
        info!(plugin = %self.context.name, "Processing results for plugin");
        self.context.trigger(JSON_HOOK, &output)
    }
}

/// Writes every payload as one line of JSON.
#[derive(Debug)]
pub(crate) struct JsonExporter {
    name: String,
    output: Option<PathBuf>,
}

impl JsonExporter {
    fn new(context: &HookContext, output: Option<PathBuf>) -> Self {
        Self {
            name: context.name.clone(),
            output,
        }
    }
}

impl Hook for JsonExporter {
    fn trigger(&self, payload: &Value) -> HookResult<()> {
        info!(hook = %self.name, "Executing JsonExporter hook...");
        let line = serde_json::to_string(payload).map_err(|e| HookError::Trigger {
            hook: self.name.clone(),
            message: e.to_string(),
        })?;

        let Some(path) = &self.output else {
            info!(hook = %self.name, payload = %line, "Exported payload");
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        debug!(hook = %self.name, path = %path.display(), "Appended payload");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_hooks::{HookManager, HookMap};
    use quarry_plugins::PluginSettings;
    use quarry_test::PackageTree;

    fn context(name: &str, hooks: HookMap, settings: PluginSettings) -> PluginContext {
        PluginContext {
            name: name.to_string(),
            directory: PathBuf::from("/plugins").join(name),
            hooks,
            settings,
        }
    }

    #[test]
    fn test_catalogs_export_builtins() {
        assert_eq!(plugin_catalog().names(), vec!["Args", "Test"]);
        assert_eq!(hook_catalog(None).names(), vec!["JsonExporter"]);
    }

    #[test]
    fn test_args_reports_settings() {
        let settings = PluginSettings::new().with("target", "10.0.0.0/24");
        let mut plugin = Args::new(&context("Args", HookMap::empty(), settings)).unwrap();

        let output = plugin.execute().unwrap();

        assert_eq!(output["plugin"], "Args");
        assert_eq!(output["settings"]["target"], "10.0.0.0/24");
        plugin.process_results(output).unwrap();
    }

    #[test]
    fn test_test_plugin_exports_through_json_hook() {
        let tree = PackageTree::new();
        tree.hook("hooks/json", &["JsonExporter"]);
        let output = tree.path("results.jsonl");
        let hooks = HookManager::new(hook_catalog(Some(output.clone())))
            .load(Some(tree.path("hooks").as_path()))
            .unwrap();

        let mut plugin = Test::new(&context("Test", hooks, PluginSettings::new())).unwrap();
        let result = plugin.execute().unwrap();
        plugin.process_results(result.clone()).unwrap();
        plugin.process_results(result).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["plugin"], "Test");
    }

    #[test]
    fn test_test_plugin_without_hook_fails() {
        let mut plugin =
            Test::new(&context("Test", HookMap::empty(), PluginSettings::new())).unwrap();
        let result = plugin.execute().unwrap();
        assert!(plugin.process_results(result).is_err());
    }

    #[test]
    fn test_json_exporter_unwritable_output() {
        let tree = PackageTree::new();
        let ctx = HookContext {
            name: "json".into(),
            type_name: "JsonExporter".into(),
            directory: tree.path("hooks/json"),
        };
        let hook = JsonExporter::new(&ctx, Some(tree.path("missing/dir/out.jsonl")));
        assert!(matches!(
            hook.trigger(&json!({"a": 1})),
            Err(HookError::Io(_))
        ));
    }
}
