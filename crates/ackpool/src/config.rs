//! Application configuration from CLI flags and environment.

use clap::Parser;

use ackpool_core::calculator::AckError;
use ackpool_core::constants::{BASELINE_MAX_VALUE, CALCULATOR_NAMES};
use ackpool_core::recursive::closed_form;

/// ackpool: Ackermann's function over pooled one-shot operations.
#[derive(Parser, Debug)]
#[command(name = "ackpool", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// First argument of f(m, n); the upper bound of m with --sweep.
    #[arg(short, long, default_value = "2", env = "ACKPOOL_M")]
    pub m: u64,

    /// Second argument of f(m, n); the upper bound of n with --sweep.
    #[arg(short, long, default_value = "2", env = "ACKPOOL_N")]
    pub n: u64,

    /// Calculator to use: pooled, recursive, boxed, or all.
    #[arg(long, default_value = "pooled")]
    pub algo: String,

    /// Run every point in 0..=m x 0..=n.
    #[arg(long)]
    pub sweep: bool,

    /// Runs per point; the reported duration is the mean.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Distribute sweep points over all cores. Requires --sweep.
    #[arg(long)]
    pub parallel: bool,

    /// Pre-allocate this many idle operations per worker.
    #[arg(long, value_name = "COUNT")]
    pub warm: Option<usize>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show worker statistics.
    #[arg(short, long)]
    pub details: bool,

    /// Write a JSON report to this path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Quiet mode (only output the values).
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Reject selections and inputs the drivers cannot finish.
    ///
    /// f(4, 2) has 19,729 decimal digits and f(5, 0) = f(4, 1) already needs
    /// billions of calls, so `m` is capped at 4 and `f(4, n)` at `n <= 1`.
    pub fn validate(&self) -> Result<(), AckError> {
        if self.algo != "all" && !CALCULATOR_NAMES.contains(&self.algo.as_str()) {
            return Err(AckError::Config(format!(
                "unknown calculator: {} (expected one of {}, all)",
                self.algo,
                CALCULATOR_NAMES.join(", ")
            )));
        }
        if self.m > 4 || (self.m == 4 && self.n > 1) {
            return Err(AckError::Config(format!(
                "f({}, {}) is out of reach; use m <= 3, or m = 4 with n <= 1",
                self.m, self.n
            )));
        }
        if self.algo != "pooled" && !baseline_fits(self.m, self.n) {
            return Err(AckError::Config(format!(
                "f({}, {}) exceeds {BASELINE_MAX_VALUE} and would overflow the stack of the \
                 recursive baselines; use --algo pooled",
                self.m, self.n
            )));
        }
        if self.parallel && !self.sweep {
            return Err(AckError::Config("--parallel requires --sweep".into()));
        }
        if self.quiet && self.verbose {
            return Err(AckError::Config(
                "--quiet and --verbose are mutually exclusive".into(),
            ));
        }
        Ok(())
    }
}

/// Whether the largest value of the run stays within the baselines' reach.
fn baseline_fits(m: u64, n: u64) -> bool {
    match (m, n) {
        (4, 0) => true,
        (4, _) => false,
        _ => closed_form(m, n).is_some_and(|value| value <= BASELINE_MAX_VALUE),
    }
}
