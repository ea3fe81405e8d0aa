//! Calculator trait, the pooled calculator, and the error taxonomy.
//!
//! `Calculator` is the public trait consumed by orchestration. The pooled
//! calculator drives the [`compute`](crate::compute::compute) future; the
//! baselines live in [`recursive`](crate::recursive) and [`boxed`](crate::boxed).

use ackpool_memory::SlotError;

use crate::compute::compute;
use crate::operation::OpToken;

/// Misuse of the one-shot completion protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// `SetResult`/`SetFault` called on an operation that already completed.
    #[error("operation completed twice in one generation")]
    DoubleCompletion,

    /// A second continuation was registered in the same generation.
    #[error("second continuation registered in one generation")]
    DoubleRegistration,

    /// Release attempted while a registered continuation has not run yet.
    #[error("operation released while its continuation is still pending")]
    ReleaseWhileAwaited,

    /// The thread's worker was borrowed again while already running.
    #[error("worker re-entered while already running on this thread")]
    Reentrant,

    /// A resolved computation was polled again.
    #[error("computation polled after it resolved")]
    PolledAfterCompletion,
}

/// Failure of the computation itself, as opposed to protocol misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// The base case `n + 1` does not fit in `u64`.
    #[error("f(0, {n}) overflows u64")]
    Overflow {
        /// Input of the base case that overflowed.
        n: u64,
    },
}

/// Error type for Ackermann computations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AckError {
    /// The token does not name the operation's live generation.
    #[error("stale token {token}: operation was released or reused")]
    StaleToken {
        /// Token that was presented.
        token: OpToken,
    },

    /// The result was read before the operation completed.
    #[error("operation {token} has not completed")]
    NotCompleted {
        /// Token of the pending operation.
        token: OpToken,
    },

    /// The completion protocol was misused.
    #[error("protocol violation: {0}")]
    ProtocolViolation(Violation),

    /// The computation faulted.
    #[error("computation faulted: {0}")]
    Faulted(Fault),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Results from different calculators don't match.
    #[error("result mismatch between calculators")]
    Mismatch,

    /// No calculator produced a value.
    #[error("no valid results")]
    NoResults,
}

impl AckError {
    /// Whether this error is a misuse of the operation protocol rather than a
    /// property of the inputs.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::StaleToken { .. } | Self::NotCompleted { .. } | Self::ProtocolViolation(_)
        )
    }
}

impl From<SlotError> for AckError {
    fn from(err: SlotError) -> Self {
        let token = match err {
            SlotError::Stale { token, .. } | SlotError::NotRented(token) | SlotError::Unknown(token) => {
                token
            }
        };
        Self::StaleToken { token }
    }
}

impl From<Violation> for AckError {
    fn from(violation: Violation) -> Self {
        Self::ProtocolViolation(violation)
    }
}

impl From<Fault> for AckError {
    fn from(fault: Fault) -> Self {
        Self::Faulted(fault)
    }
}

/// Public trait for Ackermann calculators, consumed by orchestration.
pub trait Calculator: Send + Sync {
    /// Calculate f(m, n).
    fn calculate(&self, m: u64, n: u64) -> Result<u64, AckError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Calculator backed by the pooled operation primitive.
///
/// Each call blocks the current thread on [`compute`] and therefore uses the
/// calling thread's operation pool.
///
/// # Example
/// ```
/// use ackpool_core::calculator::{Calculator, PooledCalculator};
///
/// let calc = PooledCalculator::new();
/// assert_eq!(calc.calculate(2, 3).unwrap(), 9);
/// ```
pub struct PooledCalculator;

impl PooledCalculator {
    /// Create a new `PooledCalculator`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PooledCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for PooledCalculator {
    fn calculate(&self, m: u64, n: u64) -> Result<u64, AckError> {
        futures::executor::block_on(compute(m, n))
    }

    fn name(&self) -> &str {
        "Pooled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackpool_memory::{Recycle, SlotPool};

    struct Unit;

    impl Recycle for Unit {
        fn recycle(&mut self) {}
    }

    #[test]
    fn pooled_small_values() {
        let calc = PooledCalculator::new();
        assert_eq!(calc.calculate(0, 0).unwrap(), 1);
        assert_eq!(calc.calculate(1, 1).unwrap(), 3);
        assert_eq!(calc.calculate(2, 2).unwrap(), 7);
        assert_eq!(calc.calculate(3, 3).unwrap(), 61);
        assert_eq!(calc.name(), "Pooled");
    }

    #[test]
    fn pooled_overflow_is_a_fault() {
        let calc = PooledCalculator::new();
        assert_eq!(
            calc.calculate(0, u64::MAX),
            Err(AckError::Faulted(Fault::Overflow { n: u64::MAX }))
        );
    }

    #[test]
    fn slot_errors_become_stale_token() {
        let mut pool = SlotPool::new(|| Unit);
        let token = pool.acquire();
        pool.release(token).unwrap();
        let err: AckError = pool.release(token).unwrap_err().into();
        assert_eq!(err, AckError::StaleToken { token });
        assert!(err.is_protocol_error());
    }

    #[test]
    fn ack_error_display() {
        let err = AckError::Faulted(Fault::Overflow { n: 7 });
        assert_eq!(err.to_string(), "computation faulted: f(0, 7) overflows u64");

        let err = AckError::from(Violation::DoubleCompletion);
        assert_eq!(
            err.to_string(),
            "protocol violation: operation completed twice in one generation"
        );
        assert!(!AckError::Mismatch.is_protocol_error());
    }
}
