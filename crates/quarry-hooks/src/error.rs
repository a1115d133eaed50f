//! Hook error types.

use thiserror::Error;

/// Errors from hook construction and invocation.
#[derive(Debug, Error)]
pub enum HookError {
    /// No hook is registered under the requested name.
    #[error("hook not found: {0}")]
    NotFound(String),

    /// A hook factory refused to build its instance.
    #[error("failed to construct hook {hook}: {message}")]
    Construction {
        /// Hook type name.
        hook: String,
        /// Failure reason.
        message: String,
    },

    /// The hook ran and reported a failure.
    #[error("hook {hook} failed: {message}")]
    Trigger {
        /// Hook name.
        hook: String,
        /// Failure reason.
        message: String,
    },

    /// I/O error raised by a hook.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hook operations.
pub type HookResult<T> = Result<T, HookError>;
