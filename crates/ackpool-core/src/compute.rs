//! The awaitable entry point.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::calculator::{AckError, Violation};
use crate::worker;

/// Compute `f(m, n)` on the polling thread's operation pool.
///
/// Nothing runs until the returned future is polled. The chain of pooled
/// operations completes within that first poll, so the future never returns
/// `Poll::Pending` and never stores a waker.
///
/// # Example
/// ```
/// let value = futures::executor::block_on(ackpool_core::compute(3, 3)).unwrap();
/// assert_eq!(value, 61);
/// ```
#[must_use = "futures do nothing unless polled"]
pub fn compute(m: u64, n: u64) -> Computation {
    Computation {
        inputs: Some((m, n)),
    }
}

/// Future returned by [`compute`].
#[derive(Debug)]
pub struct Computation {
    inputs: Option<(u64, u64)>,
}

impl Computation {
    /// Inputs still waiting to be computed, `None` once resolved.
    #[must_use]
    pub fn inputs(&self) -> Option<(u64, u64)> {
        self.inputs
    }
}

impl Future for Computation {
    type Output = Result<u64, AckError>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some((m, n)) = self.inputs.take() else {
            return Poll::Ready(Err(Violation::PolledAfterCompletion.into()));
        };
        Poll::Ready(worker::with_local(|worker| worker.compute(m, n)).and_then(|outcome| outcome))
    }
}
