//! CLI result presenter.

use std::fmt::Write as _;

use ackpool_orchestration::interfaces::{CalculationResult, ResultPresenter};
use ackpool_orchestration::orchestrator::total_stats;

use crate::output::{format_duration, format_number};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    /// Create a presenter. `quiet` prints bare values only.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Text printed by [`ResultPresenter::present_result`].
    #[must_use]
    pub fn render_result(&self, result: &CalculationResult, details: bool) -> String {
        let value = match &result.outcome {
            Ok(value) => value.to_string(),
            Err(err) => format!("error: {err}"),
        };
        if self.quiet {
            return value;
        }

        let mut out = String::new();
        let _ = writeln!(out, "Algorithm: {}", result.algorithm);
        let _ = writeln!(out, "Duration: {}", format_duration(result.duration));
        if details {
            let stats = &result.stats;
            let _ = writeln!(out, "Operations started: {}", format_number(stats.starts));
            let _ = writeln!(out, "Operations allocated: {}", format_number(stats.pool.misses));
            let _ = writeln!(out, "Pool hits: {}", format_number(stats.pool.hits));
            let _ = writeln!(out, "Peak rented: {}", stats.pool.peak_rented);
            let _ = writeln!(out, "Peak scheduled: {}", stats.peak_scheduled);
            let _ = writeln!(out, "Idle after run: {}", stats.idle);
        }
        let _ = write!(out, "f({}, {}) = {value}", result.m, result.n);
        out
    }

    /// Text printed by [`ResultPresenter::present_comparison`].
    #[must_use]
    pub fn render_comparison(&self, results: &[CalculationResult]) -> String {
        if self.quiet {
            return String::new();
        }

        let mut out = String::from("\nComparison Results:\n");
        let _ = writeln!(out, "{:-<60}", "");
        for result in results {
            let status = match &result.outcome {
                Ok(_) => "OK".to_string(),
                Err(err) if self.verbose => format!("ERROR: {err}"),
                Err(_) => "ERROR".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<12} f({}, {}) {:>12} {:>10} [{status}]",
                result.algorithm,
                result.m,
                result.n,
                result.value().map_or_else(|| "-".to_string(), format_number),
                format_duration(result.duration),
            );
        }
        if self.verbose {
            let (starts, allocations, time) = total_stats(results);
            let _ = writeln!(
                out,
                "  total: {} starts, {} allocations, {}",
                format_number(starts),
                format_number(allocations),
                format_duration(time)
            );
        }
        out
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_result(&self, result: &CalculationResult, details: bool) {
        println!("{}", self.render_result(result, details));
    }

    fn present_comparison(&self, results: &[CalculationResult]) {
        if !self.quiet {
            print!("{}", self.render_comparison(results));
        }
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}
