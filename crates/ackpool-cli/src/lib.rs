//! # ackpool-cli
//!
//! CLI output, JSON reports, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;

pub use output::{write_report, ReportEntry};
pub use presenter::CLIResultPresenter;
