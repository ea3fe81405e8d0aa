//! Per-thread operation pool and trampoline.
//!
//! A `Worker` owns the pool of [`Operation`]s for one thread plus the stack of
//! started-but-unevaluated operations. `start` never evaluates inline: it only
//! schedules, and `run_until_idle` pops scheduled operations one at a time.
//! Completions, on the other hand, invoke their continuation inline, which
//! keeps the protocol synchronous while the native stack stays flat.

use std::cell::RefCell;

use ackpool_memory::{PoolStats, SlotPool};
use tracing::{debug, trace, warn};

use crate::ackermann;
use crate::calculator::{AckError, Fault, Violation};
use crate::operation::{Continuation, OpStatus, OpToken, Operation};

/// Snapshot of a worker's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Number of operations started.
    pub starts: u64,
    /// Pool counters; `misses` is the number of operation allocations.
    pub pool: PoolStats,
    /// Operations currently rented.
    pub live: usize,
    /// Operations currently idle.
    pub idle: usize,
    /// Deepest the scheduled stack has been.
    pub peak_scheduled: usize,
}

impl WorkerStats {
    /// Counter delta relative to an earlier snapshot of the same worker.
    /// Gauges (`live`, `idle`) keep their current values; the peaks describe
    /// the most recent `compute` on this worker.
    #[must_use]
    pub fn since(&self, earlier: &WorkerStats) -> WorkerStats {
        WorkerStats {
            starts: self.starts.saturating_sub(earlier.starts),
            pool: self.pool - earlier.pool,
            ..*self
        }
    }
}

/// Operation pool plus trampoline for a single thread.
pub struct Worker {
    pool: SlotPool<Operation>,
    scheduled: Vec<OpToken>,
    starts: u64,
    peak_scheduled: usize,
}

impl Worker {
    /// Create a worker with an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pool: SlotPool::new(Operation::new),
            scheduled: Vec::new(),
            starts: 0,
            peak_scheduled: 0,
        }
    }

    /// Rent a pending operation with unset inputs. Never fails.
    pub fn acquire(&mut self) -> OpToken {
        self.pool.acquire()
    }

    /// Assign the inputs of a rented operation.
    pub fn bind(&mut self, token: OpToken, m: u64, n: u64) -> Result<(), AckError> {
        self.pool.get_mut(token)?.bind(m, n);
        Ok(())
    }

    /// Queue a bound operation for evaluation by the trampoline.
    pub fn schedule(&mut self, token: OpToken) -> Result<(), AckError> {
        if self.pool.get(token)?.status() != OpStatus::Pending {
            return Err(Violation::DoubleCompletion.into());
        }
        self.starts += 1;
        self.scheduled.push(token);
        self.peak_scheduled = self.peak_scheduled.max(self.scheduled.len());
        Ok(())
    }

    /// Acquire, bind and schedule `f(m, n)`. Returns the handle carrying the
    /// operation's current version.
    pub fn start(&mut self, m: u64, n: u64) -> Result<OpToken, AckError> {
        let token = self.acquire();
        self.bind(token, m, n)?;
        self.schedule(token)?;
        trace!(%token, m, n, "operation started");
        Ok(token)
    }

    /// Register the continuation of `token`. Runs it right away when the
    /// operation has already completed.
    pub fn register(
        &mut self,
        token: OpToken,
        continuation: Continuation,
    ) -> Result<(), AckError> {
        if let Some(ready) = self.pool.get_mut(token)?.register(continuation)? {
            ready.invoke(self, token)?;
        }
        Ok(())
    }

    /// Complete `token` with a value and run its continuation inline.
    pub fn set_result(&mut self, token: OpToken, value: u64) -> Result<(), AckError> {
        if let Some(continuation) = self.pool.get_mut(token)?.succeed(value)? {
            continuation.invoke(self, token)?;
        }
        Ok(())
    }

    /// Complete `token` with a fault and run its continuation inline.
    pub fn set_fault(&mut self, token: OpToken, fault: Fault) -> Result<(), AckError> {
        if let Some(continuation) = self.pool.get_mut(token)?.fail(fault)? {
            continuation.invoke(self, token)?;
        }
        Ok(())
    }

    /// Read the result of `token`.
    pub fn result(&self, token: OpToken) -> Result<u64, AckError> {
        self.pool.get(token)?.outcome(token)
    }

    /// Read the status of `token`.
    pub fn status(&self, token: OpToken) -> Result<OpStatus, AckError> {
        Ok(self.pool.get(token)?.status())
    }

    /// Read the inputs bound to `token`.
    pub fn inputs(&self, token: OpToken) -> Result<(u64, u64), AckError> {
        Ok(self.pool.get(token)?.inputs())
    }

    /// Hand `token` back to the pool.
    ///
    /// Fails if a registered continuation still has to read it.
    pub fn release(&mut self, token: OpToken) -> Result<(), AckError> {
        if self.pool.get(token)?.is_awaited() {
            return Err(Violation::ReleaseWhileAwaited.into());
        }
        self.pool.release(token)?;
        Ok(())
    }

    /// Evaluate one scheduled operation. Returns `false` when nothing is
    /// scheduled.
    pub fn step(&mut self) -> Result<bool, AckError> {
        let Some(token) = self.scheduled.pop() else {
            return Ok(false);
        };
        ackermann::evaluate(self, token)?;
        Ok(true)
    }

    /// Drive the trampoline until no operation is scheduled.
    pub fn run_until_idle(&mut self) -> Result<(), AckError> {
        while self.step()? {}
        Ok(())
    }

    /// Compute `f(m, n)` to completion on this worker.
    ///
    /// On success or fault the root operation is released and the pool is
    /// left with no rented operation. A protocol error abandons the run.
    pub fn compute(&mut self, m: u64, n: u64) -> Result<u64, AckError> {
        self.reset_peaks();
        let before = self.starts;
        let root = self.start(m, n)?;
        if let Err(err) = self.run_until_idle() {
            self.abandon();
            return Err(err);
        }
        let outcome = self.result(root);
        match &outcome {
            Err(err) if err.is_protocol_error() => {
                self.abandon();
            }
            _ => self.release(root)?,
        }
        debug!(
            m,
            n,
            starts = self.starts - before,
            allocated = self.pool.allocated(),
            "compute finished"
        );
        outcome
    }

    /// Drop all scheduled work and reclaim every rented operation,
    /// invalidating outstanding tokens. Returns the number reclaimed.
    pub fn abandon(&mut self) -> usize {
        let dropped = self.scheduled.len();
        self.scheduled.clear();
        let reclaimed = self.pool.reclaim_all();
        warn!(dropped, reclaimed, "worker abandoned run");
        reclaimed
    }

    /// Restart the high-water marks so they describe the next run only.
    pub fn reset_peaks(&mut self) {
        self.pool.reset_peak();
        self.peak_scheduled = self.scheduled.len();
    }

    /// Pre-allocate idle operations.
    pub fn warm(&mut self, count: usize) {
        self.pool.warm(count);
    }

    /// Number of rented operations.
    #[must_use]
    pub fn live(&self) -> usize {
        self.pool.rented()
    }

    /// Number of idle operations.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.pool.idle()
    }

    /// Total operations ever allocated by this worker.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.pool.allocated()
    }

    #[cfg(test)]
    pub(crate) fn take_scheduled(&mut self) -> Option<OpToken> {
        self.scheduled.pop()
    }

    /// Number of scheduled, not yet evaluated operations.
    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.scheduled.len()
    }

    /// Snapshot of this worker's counters.
    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        WorkerStats {
            starts: self.starts,
            pool: self.pool.stats(),
            live: self.pool.rented(),
            idle: self.pool.idle(),
            peak_scheduled: self.peak_scheduled,
        }
    }
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static LOCAL_WORKER: RefCell<Worker> = const { RefCell::new(Worker::new()) };
}

/// Run `f` with the calling thread's worker.
///
/// Fails with [`Violation::Reentrant`] if the worker is already borrowed on
/// this thread.
pub fn with_local<R>(f: impl FnOnce(&mut Worker) -> R) -> Result<R, AckError> {
    LOCAL_WORKER.with(|cell| {
        let mut worker = cell
            .try_borrow_mut()
            .map_err(|_| AckError::from(Violation::Reentrant))?;
        Ok(f(&mut worker))
    })
}

/// Snapshot the calling thread's worker counters.
pub fn local_stats() -> Result<WorkerStats, AckError> {
    with_local(|worker| worker.stats())
}

/// Pre-allocate idle operations in the calling thread's worker.
pub fn warm_local(count: usize) -> Result<(), AckError> {
    with_local(|worker| worker.warm(count))
}
