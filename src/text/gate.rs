//! One-shot readiness gate between the loader and every reader.

use std::sync::{Condvar, Mutex, PoisonError};

/// Outcome of a buffer's load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// The load is still running.
    #[default]
    Pending,
    /// All input was read and decoded.
    Succeeded,
    /// Reading the source failed; the buffer stays empty.
    Failed,
}

impl LoadState {
    /// Whether the load has finished, successfully or not.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Memoized one-shot outcome.
///
/// The state moves from `Pending` to `Succeeded` or `Failed` exactly once;
/// later [`finish`](Self::finish) calls are ignored. Waiters block until
/// the first transition and all observe the same outcome.
#[derive(Debug, Default)]
pub(crate) struct LoadGate {
    state: Mutex<LoadState>,
    finished: Condvar,
}

impl LoadGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state without blocking.
    #[must_use]
    pub fn state(&self) -> LoadState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome. Returns `false` if an outcome was already set.
    pub fn finish(&self, succeeded: bool) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_finished() {
            return false;
        }
        *state = if succeeded {
            LoadState::Succeeded
        } else {
            LoadState::Failed
        };
        self.finished.notify_all();
        true
    }

    /// Block until the load has finished; returns the final state.
    pub fn wait(&self) -> LoadState {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .finished
            .wait_while(state, |state| !state.is_finished())
            .unwrap_or_else(PoisonError::into_inner);
        *state
    }

    /// Block until the load has finished; `true` if it succeeded.
    pub fn wait_ready(&self) -> bool {
        self.wait() == LoadState::Succeeded
    }
}
