//! Bridge from `quarry_config::Config` to domain types.
//!
//! The config crate has no dependencies on other internal crates. This
//! module translates its string-typed sections into the types used by
//! telemetry and the runtime.

use std::path::PathBuf;

use quarry_config::Config;
use quarry_plugins::PluginSettings;
use quarry_runtime::ExecutionPolicy;
use quarry_telemetry::{FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget};

/// Setting naming the file the `JsonExporter` hook appends to.
pub(crate) const OUTPUT_SETTING: &str = "output";

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = match cfg.logging.format.as_str() {
        "pretty" => LogFormat::Pretty,
        "json" => LogFormat::Json,
        "full" => LogFormat::Full,
        _ => LogFormat::Compact,
    };

    let target = match cfg.logging.target.as_str() {
        "stdout" => LogTarget::Stdout,
        "none" => LogTarget::None,
        _ => LogTarget::Stderr,
    };

    let mut log_config = LogConfig::new(&cfg.logging.level)
        .with_format(format)
        .with_target(target);

    if let Some(file) = &cfg.logging.file {
        let rotation = match file.rotation.as_str() {
            "daily" => FileRotation::Daily,
            "hourly" => FileRotation::Hourly,
            _ => FileRotation::Never,
        };
        log_config = log_config.with_file(FileLogConfig {
            directory: file.directory.clone(),
            prefix: file.prefix.clone(),
            rotation,
        });
    }

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

/// Convert `[execution] policy` to an [`ExecutionPolicy`].
pub(crate) fn to_execution_policy(cfg: &Config) -> ExecutionPolicy {
    cfg.execution.policy.parse().unwrap_or_default()
}

/// Convert `[settings]` to [`PluginSettings`].
pub(crate) fn to_plugin_settings(cfg: &Config) -> PluginSettings {
    PluginSettings::from(cfg.settings.clone())
}

/// Output file for exported payloads, if configured.
///
/// A relative path is taken from the config file's directory.
pub(crate) fn to_output_path(cfg: &Config) -> Option<PathBuf> {
    cfg.setting_path(OUTPUT_SETTING)
}
