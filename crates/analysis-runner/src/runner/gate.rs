//! One-shot decision between completing and cancelling a run

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Outcome {
    #[default]
    Live,
    Completed,
    Cancelled,
}

/// Shared between a run's task and its handle; whichever side claims it
/// first decides the run's outcome
#[derive(Debug, Clone, Default)]
pub(crate) struct RunGate {
    outcome: Arc<Mutex<Outcome>>,
}

impl RunGate {
    /// Claim the run for completion; `false` if it was already cancelled
    pub(crate) fn complete(&self) -> bool {
        self.claim(Outcome::Completed)
    }

    /// Claim the run for cancellation; `false` if it already completed
    /// or was cancelled before
    pub(crate) fn cancel(&self) -> bool {
        self.claim(Outcome::Cancelled)
    }

    fn claim(&self, outcome: Outcome) -> bool {
        let mut current = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != Outcome::Live {
            return false;
        }
        *current = outcome;
        true
    }
}
