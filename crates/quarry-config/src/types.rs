//! Configuration struct definitions.
//!
//! Values mirror the TOML layout one to one. Enumerations such as the log
//! format or execution policy are kept as strings here and checked by
//! [`crate::validate`]; frontends convert them to domain types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application identity.
    pub app: AppSection,
    /// Logging level, format, outputs and per-crate directives.
    pub logging: LoggingSection,
    /// Where hook packages live.
    pub hooks: HooksSection,
    /// Plugin phases, processed in order.
    pub phases: Vec<PhaseSection>,
    /// Failure handling during plugin execution.
    pub execution: ExecutionSection,
    /// Free-form settings passed to every plugin.
    pub settings: BTreeMap<String, String>,
    /// Directory relative paths were resolved against, if any.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Look up a phase by name.
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&PhaseSection> {
        self.phases.iter().find(|phase| phase.name == name)
    }

    /// Join every relative directory onto `base`.
    ///
    /// `base` is remembered as [`Config::base_dir`] so path-valued
    /// `[settings]` can be resolved the same way with
    /// [`Config::setting_path`].
    pub fn resolve_paths(&mut self, base: &Path) {
        self.base_dir = Some(base.to_path_buf());
        if let Some(dir) = self.hooks.directory.as_mut() {
            resolve(dir, base);
        }
        for phase in &mut self.phases {
            resolve(&mut phase.directory, base);
        }
        if let Some(file) = self.logging.file.as_mut() {
            resolve(&mut file.directory, base);
        }
    }

    /// A non-blank setting read as a path, joined onto [`Config::base_dir`]
    /// when relative.
    #[must_use]
    pub fn setting_path(&self, key: &str) -> Option<PathBuf> {
        let value = self.settings.get(key).filter(|v| !v.trim().is_empty())?;
        let mut path = PathBuf::from(value);
        if let Some(base) = &self.base_dir {
            resolve(&mut path, base);
        }
        Some(path)
    }
}

fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

// ---------------------------------------------------------------------------
// AppSection
// ---------------------------------------------------------------------------

/// Application identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// Name printed in the startup banner.
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "quarry".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Console output: `"stdout"`, `"stderr"` or `"none"`.
    pub target: String,
    /// Optional log file written alongside the console.
    pub file: Option<LogFileSection>,
    /// Per-crate tracing directives (e.g. `["quarry_plugins=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            target: "stderr".to_owned(),
            file: None,
            directives: Vec::new(),
        }
    }
}

/// Log file output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileSection {
    /// Directory holding the log files.
    pub directory: PathBuf,
    /// File name prefix.
    pub prefix: String,
    /// Rotation: `"daily"`, `"hourly"` or `"never"`.
    pub rotation: String,
}

impl Default for LogFileSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            prefix: "plugin_manager".to_owned(),
            rotation: "never".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// HooksSection
// ---------------------------------------------------------------------------

/// Hook package location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksSection {
    /// Root directory scanned for hook packages. No directory means no hooks.
    pub directory: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// PhaseSection
// ---------------------------------------------------------------------------

/// One plugin phase, e.g. `core` or `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSection {
    /// Phase name used in log lines.
    pub name: String,
    /// Root directory scanned for the phase's plugin packages.
    pub directory: PathBuf,
}

// ---------------------------------------------------------------------------
// ExecutionSection
// ---------------------------------------------------------------------------

/// Plugin failure handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    /// `"continue"` skips the dependents of a failed plugin and keeps going;
    /// `"abort"` stops the phase at the first failure.
    pub policy: String,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            policy: "continue".to_owned(),
        }
    }
}
