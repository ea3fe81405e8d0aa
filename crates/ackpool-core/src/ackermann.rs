//! Three-way case split of `f(m, n)` wired through continuations.
//!
//! | case | condition       | action                                              |
//! |------|-----------------|-----------------------------------------------------|
//! | 1    | `m == 0`        | complete with `n + 1`                               |
//! | 2    | `m > 0, n == 0` | start `f(m-1, 1)`, forward its result               |
//! | 3    | `m > 0, n > 0`  | start `f(m, n-1)`, then `f(m-1, v)`, forward result |
//!
//! Each case returns as soon as its child is scheduled. Children are released
//! by the continuation that reads them, on success and on fault alike.

use crate::calculator::{AckError, Fault};
use crate::operation::{Continuation, ContinuationState, OpToken};
use crate::worker::Worker;

/// Evaluate a started operation.
pub(crate) fn evaluate(worker: &mut Worker, token: OpToken) -> Result<(), AckError> {
    let (m, n) = worker.inputs(token)?;

    if m == 0 {
        return match n.checked_add(1) {
            Some(value) => worker.set_result(token, value),
            None => worker.set_fault(token, Fault::Overflow { n }),
        };
    }

    let state = ContinuationState::new(token);
    if n == 0 {
        let child = worker.start(m - 1, 1)?;
        return worker.register(child, Continuation::new(forward_single, state));
    }

    let first = worker.start(m, n - 1)?;
    worker.register(first, Continuation::new(after_first, state))
}

/// Split a child's outcome into the part forwarded to the parent and the
/// protocol errors that abort the run.
fn settle(outcome: Result<u64, AckError>) -> Result<Result<u64, Fault>, AckError> {
    match outcome {
        Ok(value) => Ok(Ok(value)),
        Err(AckError::Faulted(fault)) => Ok(Err(fault)),
        Err(err) => Err(err),
    }
}

fn complete(
    worker: &mut Worker,
    target: OpToken,
    outcome: Result<u64, Fault>,
) -> Result<(), AckError> {
    match outcome {
        Ok(value) => worker.set_result(target, value),
        Err(fault) => worker.set_fault(target, fault),
    }
}

/// Case 2: the child's result is the parent's result.
fn forward_single(
    worker: &mut Worker,
    child: OpToken,
    state: ContinuationState,
) -> Result<(), AckError> {
    let outcome = settle(worker.result(child))?;
    worker.release(child)?;
    complete(worker, state.target, outcome)
}

/// Case 3, first stage: feed `v = f(m, n-1)` into `f(m-1, v)`.
fn after_first(
    worker: &mut Worker,
    first: OpToken,
    state: ContinuationState,
) -> Result<(), AckError> {
    let value = match settle(worker.result(first))? {
        Ok(value) => value,
        Err(fault) => {
            worker.release(first)?;
            return worker.set_fault(state.target, fault);
        }
    };
    let (m, _) = worker.inputs(state.target)?;
    let second = worker.start(m - 1, value)?;
    worker.register(second, Continuation::new(after_second, state.holding(first)))
}

/// Case 3, second stage: deliver the result and release both children.
fn after_second(
    worker: &mut Worker,
    second: OpToken,
    state: ContinuationState,
) -> Result<(), AckError> {
    let outcome = settle(worker.result(second))?;
    worker.release(second)?;
    if let Some(first) = state.held {
        worker.release(first)?;
    }
    complete(worker, state.target, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OpStatus;

    fn reference(m: u64, n: u64) -> u64 {
        match (m, n) {
            (0, n) => n + 1,
            (m, 0) => reference(m - 1, 1),
            (m, n) => reference(m - 1, reference(m, n - 1)),
        }
    }

    #[test]
    fn matches_reference_on_small_grid() {
        let mut worker = Worker::new();
        for m in 0..=3 {
            for n in 0..=3 {
                assert_eq!(worker.compute(m, n), Ok(reference(m, n)), "f({m}, {n})");
            }
        }
    }

    #[test]
    fn base_case_completes_in_one_step() {
        let mut worker = Worker::new();
        let token = worker.start(0, 41).unwrap();
        assert_eq!(worker.status(token), Ok(OpStatus::Pending));
        assert!(worker.step().unwrap());
        assert_eq!(worker.result(token), Ok(42));
        assert!(!worker.step().unwrap());
    }

    #[test]
    fn single_recursion_schedules_one_child() {
        let mut worker = Worker::new();
        let root = worker.start(1, 0).unwrap();
        worker.step().unwrap();
        assert_eq!(worker.scheduled(), 1);
        assert_eq!(worker.live(), 2);
        assert_eq!(worker.status(root), Ok(OpStatus::Pending));

        worker.step().unwrap();
        assert_eq!(worker.result(root), Ok(2));
        assert_eq!(worker.live(), 1, "child released by its continuation");
    }

    #[test]
    fn second_child_waits_for_first() {
        let mut worker = Worker::new();
        let root = worker.start(1, 1).unwrap();

        // root -> schedules f(1, 0)
        worker.step().unwrap();
        assert_eq!(worker.scheduled(), 1);
        // f(1, 0) -> schedules f(0, 1)
        worker.step().unwrap();
        // f(0, 1) completes, f(1, 0) completes, f(0, 2) is started
        worker.step().unwrap();
        assert_eq!(worker.scheduled(), 1);
        assert_eq!(worker.status(root), Ok(OpStatus::Pending));
        // f(0, 2) completes the root
        worker.step().unwrap();
        assert_eq!(worker.result(root), Ok(3));
        assert_eq!(worker.live(), 1);
    }

    #[test]
    fn single_recursion_forwards_fault_and_releases_child() {
        let mut worker = Worker::new();
        let parent = worker.acquire();
        let child = worker.acquire();
        worker
            .register(
                child,
                Continuation::new(forward_single, ContinuationState::new(parent)),
            )
            .unwrap();

        worker.set_fault(child, Fault::Overflow { n: 3 }).unwrap();
        assert_eq!(
            worker.result(parent),
            Err(AckError::Faulted(Fault::Overflow { n: 3 }))
        );
        assert!(matches!(
            worker.status(child),
            Err(AckError::StaleToken { .. })
        ));
        assert_eq!(worker.live(), 1);
    }

    #[test]
    fn faulted_first_child_skips_second_and_releases() {
        let mut worker = Worker::new();
        let parent = worker.acquire();
        worker.bind(parent, 2, 2).unwrap();
        let first = worker.acquire();
        worker
            .register(
                first,
                Continuation::new(after_first, ContinuationState::new(parent)),
            )
            .unwrap();

        worker
            .set_fault(first, Fault::Overflow { n: u64::MAX })
            .unwrap();
        assert_eq!(
            worker.result(parent),
            Err(AckError::Faulted(Fault::Overflow { n: u64::MAX }))
        );
        assert_eq!(worker.scheduled(), 0, "second child never started");
        assert_eq!(worker.live(), 1);
    }

    #[test]
    fn faulted_second_child_releases_both() {
        let mut worker = Worker::new();
        let parent = worker.acquire();
        worker.bind(parent, 2, 2).unwrap();
        let first = worker.acquire();
        worker
            .register(
                first,
                Continuation::new(after_first, ContinuationState::new(parent)),
            )
            .unwrap();

        // first completes: the second child f(1, 5) is started and held
        worker.set_result(first, 5).unwrap();
        assert_eq!(worker.scheduled(), 1);
        assert_eq!(worker.live(), 3);

        // Fail the second child directly instead of evaluating it
        let second = worker.take_scheduled().unwrap();
        assert_eq!(worker.inputs(second), Ok((1, 5)));
        worker.set_fault(second, Fault::Overflow { n: 0 }).unwrap();

        assert_eq!(
            worker.result(parent),
            Err(AckError::Faulted(Fault::Overflow { n: 0 }))
        );
        assert_eq!(worker.live(), 1, "both children released");
    }

    #[test]
    fn deep_n_runs_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let mut worker = Worker::new();
                (worker.compute(1, 20_000), worker.compute(2, 300))
            })
            .unwrap();
        let (single, double) = handle.join().unwrap();
        assert_eq!(single, Ok(20_002));
        assert_eq!(double, Ok(603));
    }
}
