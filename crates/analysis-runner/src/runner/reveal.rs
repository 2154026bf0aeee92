//! The timer-driven reveal task behind each run

use super::gate::RunGate;
use super::state::RunState;
use crate::api::{AnalysisSource, fetch_or_fallback};
use crate::config::RunnerConfig;
use crate::types::RunSnapshot;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Notification fired once when a run publishes its summary
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Everything one run needs; consumed by [`RevealTask::run`]
pub(crate) struct RevealTask {
    pub(crate) source: Arc<dyn AnalysisSource>,
    pub(crate) config: Arc<RunnerConfig>,
    pub(crate) token: CancellationToken,
    pub(crate) gate: RunGate,
    pub(crate) updates: watch::Sender<RunSnapshot>,
}

impl RevealTask {
    /// Fetch, reveal, settle and publish, stopping silently once cancelled
    pub(crate) async fn run(self, mut state: RunState, on_complete: CompletionCallback) {
        let symbol = state.snapshot().symbol.clone();

        let outcome = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("Run cancelled while fetching");
                return;
            }
            outcome = fetch_or_fallback(self.source.as_ref(), &symbol) => outcome,
        };

        if self.token.is_cancelled() {
            return;
        }
        info!(origin = ?outcome.origin, analysts = outcome.analysts.len(), "Starting reveal");
        state.begin_reveal(outcome);
        self.publish(&state);

        if state.len() > 0 {
            if !self.reveal(&mut state).await {
                debug!("Run cancelled during reveal");
                return;
            }

            state.settle();
            self.publish(&state);

            tokio::select! {
                biased;
                () = self.token.cancelled() => {
                    debug!("Run cancelled while settling");
                    return;
                }
                () = time::sleep(self.config.settle_interval) => {}
            }
        }

        if !self.gate.complete() {
            debug!("Run cancelled before publishing its summary");
            return;
        }
        state.publish();
        self.updates.send_replace(state.snapshot().clone());
        info!("Analysis summary published");
        on_complete();
    }

    /// Start one analyst per tick and complete each after its sampled delay
    ///
    /// Returns `false` if the run was cancelled before every analyst completed.
    async fn reveal(&self, state: &mut RunState) -> bool {
        let total = state.len();
        let period = self.config.tick_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut completions = FuturesUnordered::new();
        let mut next = 0;

        while next < total || !completions.is_empty() {
            tokio::select! {
                biased;
                () = self.token.cancelled() => return false,
                Some(index) = completions.next(), if !completions.is_empty() => {
                    if state.complete(index) {
                        debug!(index, progress = state.snapshot().progress, "Analyst complete");
                        self.publish(state);
                    }
                }
                _ = ticker.tick(), if next < total => {
                    let index = next;
                    next += 1;
                    let delay = self.config.sample_reveal_delay(&mut rand::rng());
                    if state.start(index) {
                        debug!(index, ?delay, "Analyst running");
                        self.publish(state);
                    }
                    completions.push(async move {
                        time::sleep(delay).await;
                        index
                    });
                }
            }
        }

        state.all_complete()
    }

    fn publish(&self, state: &RunState) {
        if !self.token.is_cancelled() {
            self.updates.send_replace(state.snapshot().clone());
        }
    }
}
