//! Explicit factory catalogs.
//!
//! A package manifest names the capability types it exports; the catalog
//! maps each of those names to the factory that constructs it. Only names
//! registered here can ever be instantiated, so unrelated types can't be
//! picked up by accident.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

/// Name → factory table.
///
/// `F` is the factory type of the concrete unit kind (plugin or hook).
pub struct Catalog<F> {
    factories: HashMap<String, F>,
}

impl<F> Catalog<F> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under `name`.
    ///
    /// Registering the same name twice replaces the earlier factory and
    /// logs a warning.
    pub fn register(&mut self, name: impl Into<String>, factory: F) -> &mut Self {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            warn!(name = %name, "Replaced existing factory in catalog");
        } else {
            debug!(name = %name, "Registered factory");
        }
        self
    }

    /// Builder-style variant of [`Catalog::register`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, factory: F) -> Self {
        self.register(name, factory);
        self
    }

    /// Look up the factory for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&F> {
        self.factories.get(name)
    }

    /// Whether a factory is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<F> Default for Catalog<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Clone> Clone for Catalog<F> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<F> fmt::Debug for Catalog<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}
