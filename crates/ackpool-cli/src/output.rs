//! CLI output formatting and JSON reports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ackpool_orchestration::interfaces::CalculationResult;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// One line of a JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Calculator name.
    pub algorithm: String,
    /// First argument.
    pub m: u64,
    /// Second argument.
    pub n: u64,
    /// Computed value, absent on failure.
    pub value: Option<u64>,
    /// Error message, absent on success.
    pub error: Option<String>,
    /// Mean wall time of one run in nanoseconds.
    pub nanos: u64,
    /// Operations started during one run.
    pub starts: u64,
    /// Operations allocated during one run.
    pub allocations: u64,
}

impl From<&CalculationResult> for ReportEntry {
    fn from(result: &CalculationResult) -> Self {
        Self {
            algorithm: result.algorithm.clone(),
            m: result.m,
            n: result.n,
            value: result.value(),
            error: result.error().map(ToString::to_string),
            nanos: u64::try_from(result.duration.as_nanos()).unwrap_or(u64::MAX),
            starts: result.stats.starts,
            allocations: result.stats.pool.misses,
        }
    }
}

/// Write results as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_report(path: &Path, results: &[CalculationResult]) -> io::Result<()> {
    let entries: Vec<ReportEntry> = results.iter().map(ReportEntry::from).collect();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &entries)?;
    writeln!(out)?;
    out.flush()?;
    debug!(path = %path.display(), entries = entries.len(), "report written");
    Ok(())
}

/// Read a report written by [`write_report`].
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or is not a valid report.
pub fn read_report(path: &Path) -> io::Result<Vec<ReportEntry>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(io::BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackpool_core::calculator::{AckError, Fault};
    use ackpool_core::worker::WorkerStats;

    fn sample(outcome: Result<u64, AckError>) -> CalculationResult {
        let stats = WorkerStats {
            starts: 2432,
            ..WorkerStats::default()
        };
        CalculationResult {
            algorithm: "Pooled".into(),
            m: 3,
            n: 3,
            outcome,
            duration: Duration::from_micros(250),
            stats,
        }
    }

    #[test]
    fn format_duration_micro() {
        let s = format_duration(Duration::from_nanos(500));
        assert!(s.contains("µs"));
    }

    #[test]
    fn format_duration_milli() {
        let s = format_duration(Duration::from_millis(42));
        assert!(s.contains("ms"));
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(3140)), "3.140s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000_000), "1,000,000");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn report_entry_from_success() {
        let entry = ReportEntry::from(&sample(Ok(61)));
        assert_eq!(entry.value, Some(61));
        assert_eq!(entry.error, None);
        assert_eq!(entry.nanos, 250_000);
        assert_eq!(entry.starts, 2432);
        assert_eq!(entry.allocations, 0);
    }

    #[test]
    fn report_entry_from_fault() {
        let entry = ReportEntry::from(&sample(Err(AckError::Faulted(Fault::Overflow {
            n: u64::MAX,
        }))));
        assert_eq!(entry.value, None);
        assert!(entry.error.unwrap().contains("overflows"));
    }

    #[test]
    fn write_then_read_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let results = vec![sample(Ok(61)), sample(Err(AckError::NoResults))];
        write_report(&path, &results).unwrap();

        let entries = read_report(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ReportEntry::from(&results[0]));
        assert_eq!(entries[1].error.as_deref(), Some("no valid results"));
    }

    #[test]
    fn write_report_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(write_report(&path, &[]).is_err());
    }
}
