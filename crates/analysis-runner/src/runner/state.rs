//! Run state and its transitions

use crate::api::FetchOutcome;
use crate::types::{AnalysisSummary, RunPhase, RunSnapshot, VerdictStatus, progress_percent};
use uuid::Uuid;

/// Mutable state of one run, owned by its reveal task
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    snapshot: RunSnapshot,
    held_summary: Option<AnalysisSummary>,
}

impl RunState {
    pub(crate) fn new(run_id: Uuid, symbol: impl Into<String>) -> Self {
        Self {
            snapshot: RunSnapshot::fetching(run_id, symbol),
            held_summary: None,
        }
    }

    pub(crate) fn snapshot(&self) -> &RunSnapshot {
        &self.snapshot
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.analysts.len()
    }

    /// Load the fetched data; the summary is held until `publish`
    pub(crate) fn begin_reveal(&mut self, outcome: FetchOutcome) {
        self.snapshot.origin = Some(outcome.origin);
        self.snapshot.analysts = outcome.analysts;
        self.snapshot.phase = RunPhase::Revealing;
        self.held_summary = Some(outcome.summary);
        self.recompute_progress();
    }

    /// Move analyst `index` from pending to running
    pub(crate) fn start(&mut self, index: usize) -> bool {
        self.transition(index, VerdictStatus::Pending, VerdictStatus::Running)
    }

    /// Move analyst `index` from running to complete
    pub(crate) fn complete(&mut self, index: usize) -> bool {
        let moved = self.transition(index, VerdictStatus::Running, VerdictStatus::Complete);
        if moved {
            self.recompute_progress();
        }
        moved
    }

    pub(crate) fn all_complete(&self) -> bool {
        self.snapshot.analysts.iter().all(|a| a.is_complete())
    }

    pub(crate) fn settle(&mut self) {
        self.snapshot.phase = RunPhase::Settling;
    }

    /// Publish the held summary; only the first call has an effect
    pub(crate) fn publish(&mut self) -> bool {
        match self.held_summary.take() {
            Some(summary) => {
                self.snapshot.summary = Some(summary);
                self.snapshot.phase = RunPhase::Complete;
                true
            }
            None => false,
        }
    }

    fn transition(&mut self, index: usize, from: VerdictStatus, to: VerdictStatus) -> bool {
        match self.snapshot.analysts.get_mut(index) {
            Some(analyst) if analyst.status == from => {
                analyst.status = to;
                true
            }
            _ => false,
        }
    }

    fn recompute_progress(&mut self) {
        self.snapshot.progress = progress_percent(self.snapshot.completed_count(), self.len());
    }
}
