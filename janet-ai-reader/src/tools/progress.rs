//! Progress reporting for tool calls.

/// Receives a short description of what a tool is about to do.
///
/// Reporting is fire-and-forget: it can't fail and doesn't affect results.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, intent: &str);
}

/// Logs intents through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, intent: &str) {
        tracing::info!("{}", intent);
    }
}

/// Discards intents.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _intent: &str) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, intent: &str) {
        self(intent)
    }
}
