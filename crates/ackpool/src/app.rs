//! Application entry point and dispatch.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use ackpool_cli::output::write_report;
use ackpool_cli::presenter::CLIResultPresenter;
use ackpool_core::calculator::AckError;
use ackpool_core::constants::exit_codes;
use ackpool_core::registry::DefaultFactory;
use ackpool_orchestration::calculator_selection::get_calculators_to_run;
use ackpool_orchestration::interfaces::{CalculationResult, ResultPresenter};
use ackpool_orchestration::orchestrator::{
    analyze_comparison_results, execute_calculations, execute_sweep, uses_thread_pool,
    warm_workers,
};
use ackpool_orchestration::sweep::ParameterMatrix;

use crate::config::AppConfig;
use crate::errors::handle_error;
use crate::version::full_version;

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        ackpool_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    config.validate()?;
    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<i32> {
    debug!(?config, "starting");
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    if config.verbose {
        println!("{}", full_version());
    }

    let factory = DefaultFactory::new();
    let calculators = get_calculators_to_run(&config.algo, &factory)?;

    if let Some(count) = config.warm {
        let parallel = uses_thread_pool(calculators.len(), config.sweep, config.parallel);
        warm_workers(count, parallel)?;
    }

    let results = if config.sweep {
        let matrix = ParameterMatrix::new(config.m, config.n);
        execute_sweep(&calculators, &matrix, config.iterations, config.parallel)
    } else {
        execute_calculations(&calculators, config.m, config.n, config.iterations)
    };

    // Present results
    for result in &results {
        match &result.outcome {
            Ok(_) => presenter.present_result(result, config.details),
            Err(err) => presenter.present_error(&format!(
                "{} f({}, {}): {err}",
                result.algorithm, result.m, result.n
            )),
        }
    }
    if results.len() > 1 {
        presenter.present_comparison(&results);
    }

    if let Some(ref path) = config.output {
        write_report(Path::new(path), &results)
            .with_context(|| format!("failed to write report to {path}"))?;
    }

    let failure = first_failure(&results, calculators.len() > 1);
    if let Some(err) = &failure {
        if results.len() > 1 {
            presenter.present_error(&err.to_string());
        }
    }
    Ok(failure.as_ref().map_or(exit_codes::SUCCESS, handle_error))
}

/// The error that decides the exit code: protocol errors first, then a
/// cross-validation failure, then any other failed run.
fn first_failure(results: &[CalculationResult], compare: bool) -> Option<AckError> {
    if let Some(err) = results
        .iter()
        .filter_map(CalculationResult::error)
        .find(|err| err.is_protocol_error())
    {
        return Some(err.clone());
    }
    if compare {
        if let Err(AckError::Mismatch) = analyze_comparison_results(results) {
            return Some(AckError::Mismatch);
        }
    }
    results
        .iter()
        .find_map(CalculationResult::error)
        .cloned()
}
