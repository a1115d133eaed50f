//! Run context for correlating the log lines of one orchestration run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one orchestration run.
///
/// Every phase of a run logs inside the span returned by
/// [`RunContext::span`], so the run id appears on each line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Component that started the run.
    pub source: String,
    /// Phase being processed (e.g. "core", "users").
    pub phase: Option<String>,
}

impl RunContext {
    /// Create a new run context.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source: source.into(),
            phase: None,
        }
    }

    /// Set the phase name.
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Elapsed time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        // started_at is set at creation time, so this cannot underflow.
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Tracing span carrying the run's identity.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "run",
            run_id = %self.short_id(),
            source = %self.source,
            phase = self.phase.as_deref(),
        )
    }

    /// First eight characters of the run id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.run_id.simple().to_string().chars().take(8).collect()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new("quarry")
    }
}

/// Guard that keeps a run's span entered and logs when the run ends.
pub struct RunGuard {
    context: RunContext,
    // Keeps the span entered until the guard is dropped.
    _span: tracing::span::EnteredSpan,
}

impl RunGuard {
    /// Enter the run's span.
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("Run started");
        Self {
            context,
            _span: span,
        }
    }

    /// The run context.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "Run completed");
    }
}

impl std::fmt::Debug for RunGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunGuard")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_context_creation() {
        let ctx = RunContext::new("cli");
        assert_eq!(ctx.source, "cli");
        assert!(ctx.phase.is_none());
    }

    #[test]
    fn test_run_context_phase() {
        let ctx = RunContext::new("cli").with_phase("core");
        assert_eq!(ctx.phase.as_deref(), Some("core"));
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunContext::default().run_id, RunContext::default().run_id);
    }

    #[test]
    fn test_elapsed() {
        let ctx = RunContext::new("test");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn test_short_id() {
        let ctx = RunContext::new("test");
        let short = ctx.short_id();
        assert_eq!(short.len(), 8);
        assert!(ctx.run_id.simple().to_string().starts_with(&short));
    }

    #[test]
    fn test_guard_exposes_context() {
        let ctx = RunContext::new("test").with_phase("users");
        let guard = RunGuard::new(ctx.clone());
        assert_eq!(guard.context(), &ctx);
    }

    #[test]
    fn test_serialization() {
        let ctx = RunContext::new("test").with_phase("core");

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"phase\":\"core\""));

        let parsed: RunContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ctx);
    }
}
