//! Config file loading.
//!
//! [`load_file`] runs the full algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the config file on top
//! 3. Deserialize merged tree → `Config`
//! 4. Apply `QUARRY_*` environment overrides
//! 5. Resolve relative directories against the config file's directory
//! 6. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "QUARRY_LOG";

/// The embedded defaults on their own.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the embedded defaults fail to parse, which
/// only happens if the binary was built from a broken `defaults.toml`.
pub fn defaults() -> ConfigResult<Config> {
    let merged = parse(DEFAULTS_TOML, "<embedded defaults>")?;
    into_config(merged, "<embedded defaults>")
}

/// Build a config from TOML text merged over the embedded defaults.
///
/// Environment overrides are not applied and relative paths are left as
/// written.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the text cannot be parsed or the result
/// fails validation.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    let config = merge_over_defaults(content, "<string>")?;
    validate::validate(&config)?;
    Ok(config)
}

/// Load a config file, reading overrides from the process environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or if the
/// final configuration fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    load_file_with_env(path, &collect_env_vars())
}

/// Load a config file with an explicit set of environment variables.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or if the
/// final configuration fails validation.
pub fn load_file_with_env(path: &Path, env_vars: &HashMap<String, String>) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {size} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }

    let origin = path.display().to_string();
    let mut config = merge_over_defaults(&content, &origin)?;

    let overridden = apply_env_overrides(&mut config, env_vars);
    if overridden > 0 {
        debug!(count = overridden, "applied environment variable overrides");
    }

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }

    validate::validate(&config)?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Apply `QUARRY_*` overrides, returning how many were applied.
pub fn apply_env_overrides(config: &mut Config, env_vars: &HashMap<String, String>) -> usize {
    let mut applied = 0_usize;
    if let Some(level) = env_vars.get(LOG_LEVEL_ENV).map(|v| v.trim())
        && !level.is_empty()
    {
        level.clone_into(&mut config.logging.level);
        applied = applied.saturating_add(1);
    }
    applied
}

/// Snapshot of the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn merge_over_defaults(content: &str, origin: &str) -> ConfigResult<Config> {
    let mut merged = parse(DEFAULTS_TOML, "<embedded defaults>")?;
    let overlay = parse(content, origin)?;
    deep_merge(&mut merged, &overlay);
    into_config(merged, origin)
}

fn parse(content: &str, origin: &str) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}

fn into_config(merged: toml::Value, origin: &str) -> ConfigResult<Config> {
    merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: origin.to_owned(),
            source: e,
        })
}

/// Recursively deep-merge `overlay` into `base`.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value, so a
///   file that lists `[[phases]]` replaces the default phases entirely.
fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults() {
        let config = defaults().unwrap();
        assert_eq!(config.app.name, "quarry");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.execution.policy, "continue");
        let names: Vec<_> = config.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["core", "users"]);
        assert!(config.hooks.directory.is_none());
        assert!(validate::validate(&config).is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml_str("[app]\nname = \"scanner\"\n").unwrap();
        assert_eq!(config.app.name, "scanner");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.phases.len(), 2);
    }

    #[test]
    fn test_phases_replace_defaults() {
        let config = from_toml_str(
            r#"
            [[phases]]
            name = "scanners"
            directory = "plugins/scanners"
            "#,
        )
        .unwrap();
        assert_eq!(config.phases.len(), 1);
        assert_eq!(config.phases[0].name, "scanners");
    }

    #[test]
    fn test_settings_and_log_file() {
        let config = from_toml_str(
            r#"
            [logging.file]
            directory = "var/log"

            [settings]
            output = "results.json"
            "#,
        )
        .unwrap();
        let file = config.logging.file.unwrap();
        assert_eq!(file.directory, PathBuf::from("var/log"));
        assert_eq!(file.prefix, "plugin_manager");
        assert_eq!(config.settings.get("output").unwrap(), "results.json");
    }

    #[test]
    fn test_parse_error() {
        let err = from_toml_str("[app\nname = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = from_toml_str("[app]\nname = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_file_resolves_relative_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quarry.toml");
        std::fs::write(
            &path,
            r#"
            [hooks]
            directory = "hooks"

            [[phases]]
            name = "core"
            directory = "plugins/core"
            "#,
        )
        .unwrap();

        let config = load_file_with_env(&path, &no_env()).unwrap();

        assert_eq!(
            config.hooks.directory.unwrap(),
            temp_dir.path().join("hooks")
        );
        assert_eq!(
            config.phases[0].directory,
            temp_dir.path().join("plugins/core")
        );
    }

    #[test]
    fn test_load_file_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quarry.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let env = HashMap::from([(LOG_LEVEL_ENV.to_owned(), "debug".to_owned())]);
        let config = load_file_with_env(&path, &env).unwrap();
        assert_eq!(config.logging.level, "debug");

        let blank = HashMap::from([(LOG_LEVEL_ENV.to_owned(), "  ".to_owned())]);
        let config = load_file_with_env(&path, &blank).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_file_env_override_is_validated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quarry.toml");
        std::fs::write(&path, "").unwrap();

        let env = HashMap::from([(LOG_LEVEL_ENV.to_owned(), "chatty".to_owned())]);
        let err = load_file_with_env(&path, &env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "logging.level"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_file_with_env(&temp_dir.path().join("absent.toml"), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_load_oversized_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.toml");
        let padding = "#".repeat(1_100_000);
        std::fs::write(&path, padding).unwrap();

        let err = load_file_with_env(&path, &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_deep_merge_tables() {
        let mut base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\nz = 4\n").unwrap();
        deep_merge(&mut base, &overlay);

        let a = base.get("a").unwrap();
        assert_eq!(a.get("x").unwrap().as_integer(), Some(1));
        assert_eq!(a.get("y").unwrap().as_integer(), Some(3));
        assert_eq!(a.get("z").unwrap().as_integer(), Some(4));
    }
}
