//! # ackpool-orchestration
//!
//! Calculator selection, parameter sweeps, and result cross-validation.

pub mod calculator_selection;
pub mod interfaces;
pub mod orchestrator;
pub mod sweep;

pub use interfaces::{CalculationResult, ResultPresenter};
pub use orchestrator::{
    analyze_comparison_results, execute_calculations, execute_sweep, uses_thread_pool,
    warm_workers,
};
pub use sweep::ParameterMatrix;
