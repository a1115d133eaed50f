//! Quarry Core - shared building blocks for the Quarry orchestrator.
//!
//! Plugins and hooks are both shipped as *packages*: a directory holding a
//! TOML manifest that declares a version and the capability types the
//! package exports. This crate provides the pieces both kinds share:
//!
//! - [`discovery`]: walk a directory tree and map package names to
//!   directories, honoring `IGNORE` markers
//! - [`manifest`]: parse a package manifest and resolve its version
//! - [`catalog`]: the explicit name → factory table that replaces
//!   reflection-based type discovery
//! - [`package`]: load a discovered package against a catalog
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_core::{Catalog, discover, load_package};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog: Catalog<fn() -> u32> = Catalog::new();
//! catalog.register("Answer", || 42);
//!
//! let units = discover(Some(std::path::Path::new("plugins")), "plugin.toml")?;
//! for unit in units.iter() {
//!     let package = load_package(&unit.name, &unit.directory, "plugin.toml", &catalog)?;
//!     println!("{} {}", package.name, package.version);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod package;

pub use catalog::Catalog;
pub use discovery::{DiscoveredUnit, DiscoveredUnits, EXCLUDE_MARKER, discover};
pub use error::{DiscoveryError, DiscoveryResult, LoadError, LoadResult};
pub use manifest::{PackageManifest, VERSION_FILE};
pub use package::{LoadedPackage, load_package};
