//! Plain synchronous recursion, the comparison baseline.
//!
//! Uses one native stack frame per pending call, so deep `n` needs a large
//! stack. Also provides the closed forms for `m <= 3`, used as a test oracle.

use crate::calculator::{AckError, Calculator, Fault};

/// Compute f(m, n) by direct recursion.
pub fn ackermann(m: u64, n: u64) -> Result<u64, AckError> {
    ackermann_counted(m, n).map(|(value, _)| value)
}

/// Compute f(m, n) and count the recursive calls, the root included.
pub fn ackermann_counted(m: u64, n: u64) -> Result<(u64, u64), AckError> {
    let mut calls = 0;
    let value = recurse(m, n, &mut calls)?;
    Ok((value, calls))
}

fn recurse(m: u64, n: u64, calls: &mut u64) -> Result<u64, AckError> {
    *calls += 1;
    match (m, n) {
        (0, n) => n.checked_add(1).ok_or(AckError::Faulted(Fault::Overflow { n })),
        (m, 0) => recurse(m - 1, 1, calls),
        (m, n) => {
            let inner = recurse(m, n - 1, calls)?;
            recurse(m - 1, inner, calls)
        }
    }
}

/// Closed form of f(m, n) for `m <= 3`, or `None` when `m > 3` or the value
/// does not fit in `u64`.
#[must_use]
pub fn closed_form(m: u64, n: u64) -> Option<u64> {
    match m {
        0 => n.checked_add(1),
        1 => n.checked_add(2),
        2 => n.checked_mul(2)?.checked_add(3),
        3 => {
            let shift = u32::try_from(n.checked_add(3)?).ok().filter(|s| *s < 128)?;
            u64::try_from((1u128 << shift) - 3).ok()
        }
        _ => None,
    }
}

/// Synchronous recursive calculator.
///
/// # Example
/// ```
/// use ackpool_core::calculator::Calculator;
/// use ackpool_core::recursive::RecursiveCalculator;
///
/// assert_eq!(RecursiveCalculator::new().calculate(3, 3).unwrap(), 61);
/// ```
pub struct RecursiveCalculator;

impl RecursiveCalculator {
    /// Create a new `RecursiveCalculator`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecursiveCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for RecursiveCalculator {
    fn calculate(&self, m: u64, n: u64) -> Result<u64, AckError> {
        ackermann(m, n)
    }

    fn name(&self) -> &str {
        "Recursive"
    }
}
