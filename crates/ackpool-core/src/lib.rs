//! # ackpool-core
//!
//! Pooled one-shot operations for deeply recursive async computation.
//! Each recursive call of the Ackermann function is a pooled [`operation`]
//! wired to its parent by an explicit continuation, and a per-thread
//! [`Worker`] trampolines the chain so neither the native stack nor the heap
//! grows with recursion depth once the pool is warm.

pub(crate) mod ackermann;
pub mod boxed;
pub mod calculator;
pub mod compute;
pub mod constants;
pub mod operation;
pub mod recursive;
pub mod registry;
pub mod worker;

// Re-exports
pub use calculator::{AckError, Calculator, Fault, PooledCalculator, Violation};
pub use compute::{compute, Computation};
pub use constants::{exit_codes, BASELINE_MAX_VALUE, CALCULATOR_NAMES, STARTS_3_3};
pub use operation::{OpStatus, OpToken};
pub use registry::{CalculatorFactory, DefaultFactory};
pub use worker::{Worker, WorkerStats};

/// Compute f(m, n) on the calling thread's pool, blocking until done.
///
/// This is a convenience wrapper around [`compute`]. Use the future directly
/// to compose with other async code.
///
/// # Example
/// ```
/// assert_eq!(ackpool_core::ackermann(2, 3), Ok(9));
/// ```
pub fn ackermann(m: u64, n: u64) -> Result<u64, AckError> {
    futures::executor::block_on(compute(m, n))
}
