//! `quarry list`: show the packages each section would load, without
//! running anything.

use std::io::Write;
use std::path::Path;

use quarry_config::Config;
use quarry_core::{Catalog, discover, load_package};
use quarry_hooks::HOOK_MANIFEST_FILE;
use quarry_plugins::PLUGIN_MANIFEST_FILE;

use crate::builtins;
use crate::config_bridge;

/// Print hook and phase packages to stdout.
pub(crate) fn list_packages(config: &Config) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(config, &mut out)
}

fn render(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let hooks = builtins::hook_catalog(config_bridge::to_output_path(config));
    section(
        out,
        "hooks",
        config.hooks.directory.as_deref(),
        HOOK_MANIFEST_FILE,
        &hooks,
    )?;

    let plugins = builtins::plugin_catalog();
    for phase in &config.phases {
        section(
            out,
            &phase.name,
            Some(phase.directory.as_path()),
            PLUGIN_MANIFEST_FILE,
            &plugins,
        )?;
    }
    Ok(())
}

fn section<F>(
    out: &mut impl Write,
    title: &str,
    dir: Option<&Path>,
    entry_file: &str,
    catalog: &Catalog<F>,
) -> anyhow::Result<()> {
    let Some(dir) = dir else {
        writeln!(out, "{title}: not configured")?;
        return Ok(());
    };
    writeln!(out, "{title} ({})", dir.display())?;

    let units = match discover(Some(dir), entry_file) {
        Ok(units) => units,
        Err(e) => {
            writeln!(out, "  error: {e}")?;
            return Ok(());
        },
    };
    if units.is_empty() {
        writeln!(out, "  (no packages)")?;
        return Ok(());
    }

    for unit in units.iter() {
        match load_package(&unit.name, &unit.directory, entry_file, catalog) {
            Ok(package) => writeln!(
                out,
                "  {:<20} {:<10} {}",
                package.name,
                package.version,
                package.exports.join(", ")
            )?,
            Err(e) => writeln!(out, "  {:<20} {:<10} error: {e}", unit.name, "-")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_config::{HooksSection, PhaseSection};
    use quarry_test::PackageTree;

    #[test]
    fn test_render_lists_sections() {
        let tree = PackageTree::new();
        tree.hook("hooks/json", &["JsonExporter"]);
        tree.plugin("core/args", &["Args"]);
        tree.plugin("core/mystery", &["Mystery"]);

        let mut config = Config::defaults().unwrap();
        config.hooks = HooksSection {
            directory: Some(tree.path("hooks")),
        };
        config.phases = vec![
            PhaseSection {
                name: "core".into(),
                directory: tree.path("core"),
            },
            PhaseSection {
                name: "users".into(),
                directory: tree.path("users"),
            },
        ];

        let mut buf = Vec::new();
        render(&config, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("json"));
        assert!(text.contains("JsonExporter"));
        assert!(text.contains("Args"));
        assert!(text.lines().any(|l| l.contains("mystery") && l.contains("error:")));
        assert!(text.lines().any(|l| l.starts_with("  error:")));
    }

    #[test]
    fn test_render_without_hooks() {
        let mut config = Config::defaults().unwrap();
        config.phases.clear();

        let mut buf = Vec::new();
        render(&config, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "hooks: not configured\n");
    }
}
