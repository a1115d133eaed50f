//! Prelude module - commonly used test utilities.
//!
//! Use `use quarry_test::prelude::*;` to import all essential helpers.

// Fixtures
pub use crate::{PackageTree, manifest};

// Mocks
pub use crate::{CallLog, FailAt, FailingHook, FailingPlugin, RecordingHook, RecordingPlugin};

// Catalog helpers
pub use crate::{
    add_failing_plugin, add_triggering_plugin, failing_hooks, recording_hooks, recording_plugins,
};
