//! `quarry run`: build the hook map, then process every phase in order.

use anyhow::Context;
use tracing::{info, warn};

use quarry_config::Config;
use quarry_runtime::{HookHandler, PluginHandler};

use crate::builtins;
use crate::config_bridge;

/// Process each configured phase, returning whether all of them succeeded.
///
/// A failing phase does not stop later phases.
pub(crate) fn run_phases(config: &Config) -> anyhow::Result<bool> {
    let hooks = HookHandler::new(builtins::hook_catalog(config_bridge::to_output_path(config)))
        .load(config.hooks.directory.as_deref())
        .context("failed to load hooks")?;
    info!(hooks = ?hooks.names(), "Hooks ready");

    let handler = PluginHandler::new(builtins::plugin_catalog(), hooks)
        .with_settings(config_bridge::to_plugin_settings(config))
        .with_policy(config_bridge::to_execution_policy(config))
        .with_source(config.app.name.clone());

    let mut all_ok = true;
    for phase in &config.phases {
        if !handler.process(&phase.name, Some(phase.directory.as_path())) {
            all_ok = false;
        }
    }

    if !all_ok {
        warn!("One or more phases did not complete");
    }
    Ok(all_ok)
}
