//! Core orchestration: sequential and parallel execution, result analysis.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, trace};

use ackpool_core::calculator::{AckError, Calculator};
use ackpool_core::worker::{self, WorkerStats};

use crate::interfaces::CalculationResult;
use crate::sweep::ParameterMatrix;

/// Run one calculator `iterations` times on `(m, n)` on the current thread.
fn run_point(calc: &dyn Calculator, m: u64, n: u64, iterations: u32) -> CalculationResult {
    let iterations = iterations.max(1);
    let start = Instant::now();

    // Warm-up runs; only the last one is reported. A failing input fails the
    // same way every time, so the first failure ends the warm-up.
    for run in 1..iterations {
        if let Err(err) = calc.calculate(m, n) {
            debug!(algorithm = calc.name(), m, n, run, %err, "warm-up run failed");
            break;
        }
    }
    let before = worker::local_stats().unwrap_or_default();
    let outcome = calc.calculate(m, n);
    let stats = worker::local_stats()
        .map(|after| after.since(&before))
        .unwrap_or_default();

    let duration = start.elapsed() / iterations;
    trace!(algorithm = calc.name(), m, n, ?duration, "point done");

    CalculationResult {
        algorithm: calc.name().to_string(),
        m,
        n,
        outcome,
        duration,
        stats,
    }
}

/// Execute `f(m, n)` with all given calculators.
///
/// A single calculator runs on the calling thread; several run in parallel on
/// rayon's pool, each on its own thread-local worker.
pub fn execute_calculations(
    calculators: &[Arc<dyn Calculator>],
    m: u64,
    n: u64,
    iterations: u32,
) -> Vec<CalculationResult> {
    if let [calc] = calculators {
        return vec![run_point(calc.as_ref(), m, n, iterations)];
    }

    calculators
        .into_par_iter()
        .map(|calc| run_point(calc.as_ref(), m, n, iterations))
        .collect()
}

/// Execute every point of `matrix` with every calculator.
///
/// Results come back in matrix order, calculators innermost, whether or not
/// `parallel` distributes the points over rayon's pool.
pub fn execute_sweep(
    calculators: &[Arc<dyn Calculator>],
    matrix: &ParameterMatrix,
    iterations: u32,
    parallel: bool,
) -> Vec<CalculationResult> {
    let jobs: Vec<(u64, u64, &Arc<dyn Calculator>)> = matrix
        .points()
        .flat_map(|(m, n)| calculators.iter().map(move |calc| (m, n, calc)))
        .collect();
    debug!(jobs = jobs.len(), parallel, iterations, "starting sweep");

    if parallel {
        jobs.into_par_iter()
            .map(|(m, n, calc)| run_point(calc.as_ref(), m, n, iterations))
            .collect()
    } else {
        jobs.into_iter()
            .map(|(m, n, calc)| run_point(calc.as_ref(), m, n, iterations))
            .collect()
    }
}

/// Check that calculators agree at every `(m, n)` point.
///
/// Failed runs are ignored. Fails with [`AckError::NoResults`] when no run
/// succeeded, and with [`AckError::Mismatch`] when two successful runs at the
/// same point disagree.
pub fn analyze_comparison_results(results: &[CalculationResult]) -> Result<(), AckError> {
    let mut by_point: BTreeMap<(u64, u64), u64> = BTreeMap::new();
    let mut any_valid = false;

    for result in results {
        let Some(value) = result.value() else {
            continue;
        };
        any_valid = true;
        match by_point.get(&(result.m, result.n)) {
            Some(&expected) if expected != value => {
                debug!(
                    algorithm = %result.algorithm,
                    m = result.m,
                    n = result.n,
                    expected,
                    value,
                    "calculators disagree"
                );
                return Err(AckError::Mismatch);
            }
            Some(_) => {}
            None => {
                by_point.insert((result.m, result.n), value);
            }
        }
    }

    if any_valid {
        Ok(())
    } else {
        Err(AckError::NoResults)
    }
}

/// Whether a run dispatches work to rayon's pool rather than running every
/// point on the calling thread.
///
/// Sweeps use rayon only when `parallel` is set. A single point runs inline
/// for one calculator and on rayon for several.
#[must_use]
pub fn uses_thread_pool(calculators: usize, sweep: bool, parallel: bool) -> bool {
    if sweep {
        parallel
    } else {
        calculators > 1
    }
}

/// Pre-populate the worker pools that will serve a run.
///
/// The calling thread always warms its own worker. With `parallel` every
/// rayon thread warms its own as well.
pub fn warm_workers(count: usize, parallel: bool) -> Result<(), AckError> {
    debug!(count, parallel, "warming worker pools");
    worker::warm_local(count)?;
    if parallel {
        rayon::broadcast(|_| worker::warm_local(count))
            .into_iter()
            .collect::<Result<(), AckError>>()?;
    }
    Ok(())
}

/// Sum of the per-run counters over a set of results.
pub fn total_stats(results: &[CalculationResult]) -> (u64, u64, Duration) {
    results.iter().fold((0, 0, Duration::ZERO), |(starts, misses, time), r| {
        (
            starts + r.stats.starts,
            misses + r.stats.pool.misses,
            time + r.duration,
        )
    })
}
