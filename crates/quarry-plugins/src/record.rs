//! Plugin descriptor records.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PluginResult;
use crate::plugin::{Plugin, PluginContext, PluginFactory};

/// Everything known about one registered plugin.
pub struct PluginRecord {
    name: String,
    module_name: String,
    version: String,
    source_directory: PathBuf,
    manifest_path: PathBuf,
    dependencies: Vec<String>,
    context: PluginContext,
    factory: PluginFactory,
    instance: Box<dyn Plugin>,
    activated: bool,
}

impl PluginRecord {
    /// Construct a record, building the initial instance with `factory`.
    ///
    /// # Errors
    ///
    /// Returns the factory's error if the instance cannot be built.
    pub fn build(
        module_name: impl Into<String>,
        version: impl Into<String>,
        manifest_path: impl Into<PathBuf>,
        context: PluginContext,
        factory: PluginFactory,
    ) -> PluginResult<Self> {
        let instance = factory(&context)?;
        Ok(Self {
            name: context.name.clone(),
            module_name: module_name.into(),
            version: version.into(),
            source_directory: context.directory.clone(),
            manifest_path: manifest_path.into(),
            dependencies: Vec::new(),
            context,
            factory,
            instance,
            activated: false,
        })
    }

    /// Plugin name (exported type name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the package the plugin was loaded from.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Package version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Package directory; the dependency file is looked up here.
    #[must_use]
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// Manifest the package was loaded from.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Declared dependencies, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Attach declared dependencies.
    pub fn set_dependencies(&mut self, dependencies: Vec<String>) {
        self.dependencies = dependencies;
    }

    /// Context the plugin was constructed with.
    #[must_use]
    pub fn context(&self) -> &PluginContext {
        &self.context
    }

    /// Whether the instance was rebuilt after its dependencies resolved.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// The live instance.
    pub fn instance_mut(&mut self) -> &mut dyn Plugin {
        self.instance.as_mut()
    }

    /// Replace the instance with a fresh one from the same factory and
    /// context, marking the record activated.
    ///
    /// State accumulated by the previous instance is discarded.
    ///
    /// # Errors
    ///
    /// Returns the factory's error; the previous instance is kept.
    pub fn activate(&mut self) -> PluginResult<()> {
        self.instance = (self.factory)(&self.context)?;
        self.activated = true;
        Ok(())
    }
}

impl fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRecord")
            .field("name", &self.name)
            .field("module_name", &self.module_name)
            .field("version", &self.version)
            .field("source_directory", &self.source_directory)
            .field("dependencies", &self.dependencies)
            .field("activated", &self.activated)
            .finish_non_exhaustive()
    }
}
