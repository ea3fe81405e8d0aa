//! Naive async baseline: one boxed future per recursive call.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::calculator::{AckError, Calculator, Fault};

/// Compute f(m, n) with async recursion, allocating a boxed future per call.
pub fn ackermann_boxed(m: u64, n: u64) -> BoxFuture<'static, Result<u64, AckError>> {
    async move {
        match (m, n) {
            (0, n) => n.checked_add(1).ok_or(AckError::Faulted(Fault::Overflow { n })),
            (m, 0) => ackermann_boxed(m - 1, 1).await,
            (m, n) => {
                let inner = ackermann_boxed(m, n - 1).await?;
                ackermann_boxed(m - 1, inner).await
            }
        }
    }
    .boxed()
}

/// Calculator that blocks on [`ackermann_boxed`].
pub struct BoxedAsyncCalculator;

impl BoxedAsyncCalculator {
    /// Create a new `BoxedAsyncCalculator`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for BoxedAsyncCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for BoxedAsyncCalculator {
    fn calculate(&self, m: u64, n: u64) -> Result<u64, AckError> {
        futures::executor::block_on(ackermann_boxed(m, n))
    }

    fn name(&self) -> &str {
        "BoxedAsync"
    }
}
