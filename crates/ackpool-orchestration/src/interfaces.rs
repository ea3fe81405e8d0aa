//! Orchestration interfaces.

use std::time::Duration;

use ackpool_core::calculator::AckError;
use ackpool_core::worker::WorkerStats;

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present a calculation result.
    fn present_result(&self, result: &CalculationResult, details: bool);

    /// Present a comparison of several calculators.
    fn present_comparison(&self, results: &[CalculationResult]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of running one calculator on one `(m, n)` point.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// Calculator name.
    pub algorithm: String,
    /// First argument.
    pub m: u64,
    /// Second argument.
    pub n: u64,
    /// The computed value or a structured error.
    pub outcome: Result<u64, AckError>,
    /// Mean duration of one run.
    pub duration: Duration,
    /// Worker counters for one run on the executing thread. Only the pooled
    /// calculator moves these.
    pub stats: WorkerStats,
}

impl CalculationResult {
    /// The computed value, if the run succeeded.
    #[must_use]
    pub fn value(&self) -> Option<u64> {
        self.outcome.as_ref().ok().copied()
    }

    /// The error, if the run failed.
    #[must_use]
    pub fn error(&self) -> Option<&AckError> {
        self.outcome.as_ref().err()
    }
}
