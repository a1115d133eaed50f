//! Execution failure policy.

use serde::{Deserialize, Serialize};

/// What a run does when a plugin's `execute` or `process_results` fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// Record the failure, skip every plugin that depends on the failed one
    /// (directly or transitively), and keep running the rest.
    #[default]
    Continue,
    /// Stop the run at the first failure and return it as an error.
    Abort,
}

impl std::fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

impl std::str::FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "unknown execution policy '{other}' (expected 'continue' or 'abort')"
            )),
        }
    }
}
