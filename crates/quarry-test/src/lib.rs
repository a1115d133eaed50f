//! Quarry Test - Shared test utilities for the Quarry orchestrator.
//!
//! This crate provides on-disk package fixtures and mock plugins and hooks
//! that can be used across Quarry crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! quarry-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use quarry_test::{CallLog, PackageTree, recording_plugins};
//!
//! #[test]
//! fn test_runs_in_dependency_order() {
//!     let tree = PackageTree::new();
//!     tree.plugin("b", &["B"]).depends("b", &["A"]);
//!     tree.plugin("a", &["A"]);
//!
//!     let log = CallLog::new();
//!     let catalog = recording_plugins(&log, &["A", "B"]);
//!     // run an orchestrator over tree.root() ...
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
