//! One-shot completion promise.
//!
//! A [`Promise`] starts out pending and is settled exactly once, either
//! fulfilled with a value or failed with an [`ExecutionError`]. Any number of
//! observers may block on it, with or without a deadline; all of them are
//! released by the settling write.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::errors::{ExecutionError, PromiseError};

enum State<T> {
    Pending,
    Fulfilled(T),
    Failed(ExecutionError),
}

impl<T: Clone> State<T> {
    fn outcome(&self) -> Option<Result<T, ExecutionError>> {
        match self {
            State::Pending => None,
            State::Fulfilled(value) => Some(Ok(value.clone())),
            State::Failed(error) => Some(Err(error.clone())),
        }
    }
}

/// A write-once, many-reader synchronization cell.
///
/// The settling write happens-before every `get` that observes it: the state
/// lives behind a mutex and waiters are woken through a condition variable.
pub struct Promise<T> {
    state: Mutex<State<T>>,
    settled: Condvar,
}

impl<T: Clone> Promise<T> {
    /// Create a pending promise.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Pending),
            settled: Condvar::new(),
        }
    }

    /// Fulfil the promise with `value`.
    ///
    /// Returns `false` and leaves the promise untouched if it was already
    /// settled. Settling twice is a logic error in the caller.
    pub fn complete(&self, value: T) -> bool {
        self.settle(State::Fulfilled(value))
    }

    /// Fail the promise with `error`.
    ///
    /// Same write-once rule as [`complete`](Self::complete).
    pub fn fail(&self, error: ExecutionError) -> bool {
        self.settle(State::Failed(error))
    }

    /// Block until the promise is settled and return its outcome.
    pub fn get(&self) -> Result<T, ExecutionError> {
        let mut state = self.lock();
        loop {
            if let Some(outcome) = state.outcome() {
                return outcome;
            }
            state = self
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block for at most `timeout` waiting for the promise to settle.
    ///
    /// Returns [`PromiseError::Timeout`] if the promise is still pending when
    /// the deadline passes. A timeout too large to represent as a deadline
    /// waits indefinitely.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, PromiseError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.get().map_err(PromiseError::from);
        };

        let mut state = self.lock();
        loop {
            if let Some(outcome) = state.outcome() {
                return outcome.map_err(PromiseError::from);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(PromiseError::Timeout(timeout));
            }
            // Spurious wakeups and early returns just go around the loop again.
            let (guard, _) = self
                .settled
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    /// Return the outcome if the promise is already settled, without blocking.
    pub fn try_get(&self) -> Option<Result<T, ExecutionError>> {
        self.lock().outcome()
    }

    /// Returns `true` once the promise has been fulfilled or failed.
    pub fn is_done(&self) -> bool {
        !matches!(*self.lock(), State::Pending)
    }

    /// Returns `true` if the promise was settled through [`fail`](Self::fail).
    pub fn is_failed(&self) -> bool {
        matches!(*self.lock(), State::Failed(_))
    }

    fn settle(&self, outcome: State<T>) -> bool {
        let mut state = self.lock();
        if !matches!(*state, State::Pending) {
            return false;
        }
        *state = outcome;
        drop(state);
        self.settled.notify_all();
        true
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // No user code ever runs under this lock, so poisoning carries no
        // information about the state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Promise");
        match self.try_get() {
            None => debug.field("state", &"pending"),
            Some(Ok(value)) => debug.field("value", &value),
            Some(Err(error)) => debug.field("error", &error),
        };
        debug.finish()
    }
}
