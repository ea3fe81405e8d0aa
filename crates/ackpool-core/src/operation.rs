//! One-shot operation record and its completion protocol.
//!
//! An `Operation` is a pooled record for a single call `f(m, n)`. Within one
//! generation it completes exactly once and hands its registered continuation
//! out exactly once. The generation itself is tracked by the owning
//! [`SlotPool`](ackpool_memory::SlotPool): the [`OpToken`] issued at rent time
//! carries the version that every later access must present.

use std::fmt;

use ackpool_memory::{Recycle, SlotToken};

use crate::calculator::{AckError, Fault, Violation};
use crate::worker::Worker;

/// Versioned handle to a rented operation.
pub type OpToken = SlotToken;

/// Completion status of an operation within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    /// No result yet.
    #[default]
    Pending,
    /// Completed with a value.
    Succeeded,
    /// Completed with a fault.
    Faulted,
}

/// Opaque state carried by a continuation.
///
/// `target` is the operation the continuation will complete; `held` is an
/// operation the continuation keeps alive until it runs (the first child of a
/// double recursion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationState {
    /// Operation completed by the continuation.
    pub target: OpToken,
    /// Extra operation owned by the continuation, released when it runs.
    pub held: Option<OpToken>,
}

impl ContinuationState {
    /// State that completes `target` and owns nothing else.
    #[must_use]
    pub fn new(target: OpToken) -> Self {
        Self { target, held: None }
    }

    /// Same target, additionally owning `held`.
    #[must_use]
    pub fn holding(self, held: OpToken) -> Self {
        Self {
            held: Some(held),
            ..self
        }
    }
}

/// Continuation callback: receives the worker, the token of the operation
/// that just completed, and the registered state.
pub type Callback = fn(&mut Worker, OpToken, ContinuationState) -> Result<(), AckError>;

/// A callback plus its opaque state, invoked once after completion.
#[derive(Clone, Copy)]
pub struct Continuation {
    callback: Callback,
    state: ContinuationState,
}

impl Continuation {
    /// Pair a callback with its state.
    #[must_use]
    pub fn new(callback: Callback, state: ContinuationState) -> Self {
        Self { callback, state }
    }

    /// State passed to the callback.
    #[must_use]
    pub fn state(&self) -> ContinuationState {
        self.state
    }

    pub(crate) fn invoke(self, worker: &mut Worker, source: OpToken) -> Result<(), AckError> {
        (self.callback)(worker, source, self.state)
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Pooled record for one call `f(m, n)`.
#[derive(Debug, Default)]
pub struct Operation {
    m: u64,
    n: u64,
    result: u64,
    fault: Option<Fault>,
    status: OpStatus,
    continuation: Option<Continuation>,
    registered: bool,
}

impl Recycle for Operation {
    fn recycle(&mut self) {
        *self = Self::default();
    }
}

impl Operation {
    /// Create a pending operation with unset inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the inputs of this generation.
    pub fn bind(&mut self, m: u64, n: u64) {
        self.m = m;
        self.n = n;
    }

    /// Inputs bound at start.
    #[must_use]
    pub fn inputs(&self) -> (u64, u64) {
        (self.m, self.n)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> OpStatus {
        self.status
    }

    /// Whether a registered continuation has not been handed out yet.
    #[must_use]
    pub fn is_awaited(&self) -> bool {
        self.continuation.is_some()
    }

    /// Store a value and hand back the continuation to run, if registered.
    pub fn succeed(&mut self, value: u64) -> Result<Option<Continuation>, AckError> {
        self.ensure_pending()?;
        self.result = value;
        self.status = OpStatus::Succeeded;
        Ok(self.continuation.take())
    }

    /// Store a fault and hand back the continuation to run, if registered.
    pub fn fail(&mut self, fault: Fault) -> Result<Option<Continuation>, AckError> {
        self.ensure_pending()?;
        self.fault = Some(fault);
        self.status = OpStatus::Faulted;
        Ok(self.continuation.take())
    }

    fn ensure_pending(&self) -> Result<(), AckError> {
        if self.status != OpStatus::Pending {
            return Err(Violation::DoubleCompletion.into());
        }
        Ok(())
    }

    /// Register the single continuation of this generation.
    ///
    /// Returns the continuation back when the operation has already
    /// completed; the caller must then invoke it immediately.
    pub fn register(
        &mut self,
        continuation: Continuation,
    ) -> Result<Option<Continuation>, AckError> {
        if self.registered {
            return Err(Violation::DoubleRegistration.into());
        }
        self.registered = true;
        if self.status == OpStatus::Pending {
            self.continuation = Some(continuation);
            Ok(None)
        } else {
            Ok(Some(continuation))
        }
    }

    /// Read the outcome. `token` only labels the error; version checks are
    /// done by the pool before the record is reached.
    pub fn outcome(&self, token: OpToken) -> Result<u64, AckError> {
        match self.status {
            OpStatus::Pending => Err(AckError::NotCompleted { token }),
            OpStatus::Succeeded => Ok(self.result),
            OpStatus::Faulted => match self.fault {
                Some(fault) => Err(AckError::Faulted(fault)),
                None => Err(AckError::NotCompleted { token }),
            },
        }
    }
}
