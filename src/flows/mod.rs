//! Form submission flows.
//!
//! Each flow is a small state machine, `Idle → Submitting → {Success,
//! Failure}`, that owns its in-flight flag: a second submit while one is in
//! flight is refused with [`Submission::Busy`] and sends nothing. Dropping
//! an in-flight submit future cancels the request and returns the flow to
//! `Idle`.

pub mod create_user;
pub mod login;

use std::sync::{Mutex, PoisonError};

use crate::forms::FormErrors;

pub use create_user::{CreateUserFlow, CreateUserState};
pub use login::{LoginFlow, LoginState};

/// Where a flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState<T, F: Ord> {
    Idle,
    Submitting,
    Success(T),
    Failure(FormErrors<F>),
}

/// Result of one call to a flow's `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T, F: Ord> {
    Done(T),
    /// Validation or server errors, keyed by the field they belong to.
    Invalid(FormErrors<F>),
    /// A submission was already in flight; nothing was sent.
    Busy,
}

pub(crate) struct StateCell<T, F: Ord> {
    state: Mutex<FlowState<T, F>>,
}

impl<T: Clone, F: Ord + Clone> StateCell<T, F> {
    pub(crate) fn new() -> Self {
        Self { state: Mutex::new(FlowState::Idle) }
    }

    pub(crate) fn get(&self) -> FlowState<T, F> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, next: FlowState<T, F>) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Back to `Idle` unless a submission is in flight.
    pub(crate) fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, FlowState::Submitting) {
            *state = FlowState::Idle;
        }
    }

    /// Claim the in-flight slot, or `None` if someone already holds it.
    pub(crate) fn begin(&self) -> Option<Flight<'_, T, F>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, FlowState::Submitting) {
            return None;
        }
        *state = FlowState::Submitting;
        Some(Flight { cell: self, finished: false })
    }
}

/// Held for the duration of one submission.
pub(crate) struct Flight<'a, T: Clone, F: Ord + Clone> {
    cell: &'a StateCell<T, F>,
    finished: bool,
}

impl<T: Clone, F: Ord + Clone> Flight<'_, T, F> {
    pub(crate) fn finish(mut self, next: FlowState<T, F>) {
        self.finished = true;
        self.cell.set(next);
    }
}

impl<T: Clone, F: Ord + Clone> Drop for Flight<'_, T, F> {
    fn drop(&mut self) {
        if !self.finished {
            self.cell.set(FlowState::Idle);
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
