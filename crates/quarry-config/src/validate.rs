//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! the accepted sets and that cross-field invariants hold.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];
const TARGETS: [&str; 3] = ["stdout", "stderr", "none"];
const ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];
const POLICIES: [&str; 2] = ["continue", "abort"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_app(config)?;
    validate_logging(config)?;
    validate_phases(config)?;
    validate_execution(config)?;
    Ok(())
}

fn one_of(field: &str, kind: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!(
            "unsupported {kind} '{value}'; expected one of: {}",
            allowed.join(", ")
        ),
    })
}

fn validate_app(config: &Config) -> ConfigResult<()> {
    if config.app.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "app.name".to_owned(),
            message: "name must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let logging = &config.logging;
    one_of("logging.level", "log level", &logging.level, &LEVELS)?;
    one_of("logging.format", "log format", &logging.format, &FORMATS)?;
    one_of("logging.target", "log target", &logging.target, &TARGETS)?;

    if let Some(file) = &logging.file {
        one_of(
            "logging.file.rotation",
            "rotation",
            &file.rotation,
            &ROTATIONS,
        )?;
        if file.prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "logging.file.prefix".to_owned(),
                message: "prefix must not be empty".to_owned(),
            });
        }
    }

    if logging.target == "none" && logging.file.is_none() {
        return Err(ConfigError::ValidationError {
            field: "logging.target".to_owned(),
            message: "target 'none' requires a [logging.file] section".to_owned(),
        });
    }

    Ok(())
}

fn validate_phases(config: &Config) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (index, phase) in config.phases.iter().enumerate() {
        if phase.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("phases[{index}].name"),
                message: "phase name must not be empty".to_owned(),
            });
        }
        if !seen.insert(phase.name.as_str()) {
            return Err(ConfigError::ValidationError {
                field: format!("phases[{index}].name"),
                message: format!("duplicate phase '{}'", phase.name),
            });
        }
    }
    Ok(())
}

fn validate_execution(config: &Config) -> ConfigResult<()> {
    one_of(
        "execution.policy",
        "execution policy",
        &config.execution.policy,
        &POLICIES,
    )
}
