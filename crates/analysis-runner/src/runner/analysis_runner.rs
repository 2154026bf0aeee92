//! Analysis runner - one cancellable run per activated symbol

use super::gate::RunGate;
use super::reveal::RevealTask;
use super::state::RunState;
use crate::api::{AnalysisSource, HttpAnalysisClient};
use crate::config::RunnerConfig;
use crate::error::{AnalysisError, Result};
use crate::types::RunSnapshot;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

struct ActiveRun {
    run_id: Uuid,
    token: CancellationToken,
    gate: RunGate,
    handle: JoinHandle<()>,
    updates: watch::Receiver<RunSnapshot>,
}

impl ActiveRun {
    fn cancel(&self) -> bool {
        let was_live = self.gate.cancel();
        self.token.cancel();
        self.handle.abort();
        was_live
    }
}

/// Drives the staged reveal of analyst verdicts for one symbol at a time
///
/// # Example
///
/// ```rust,no_run
/// use analysis_runner::{AnalysisRunner, RunnerConfig};
///
/// # async fn demo() -> analysis_runner::Result<()> {
/// let mut runner = AnalysisRunner::from_config(RunnerConfig::default().with_env()?)?;
/// let (tx, rx) = tokio::sync::oneshot::channel();
/// runner.activate("AAPL", move || {
///     let _ = tx.send(());
/// })?;
/// let _ = rx.await;
/// println!("{:?}", runner.snapshot().and_then(|s| s.summary));
/// # Ok(())
/// # }
/// ```
pub struct AnalysisRunner {
    source: Arc<dyn AnalysisSource>,
    config: Arc<RunnerConfig>,
    current: Option<ActiveRun>,
}

impl AnalysisRunner {
    pub fn new(source: Arc<dyn AnalysisSource>, config: Arc<RunnerConfig>) -> Self {
        Self {
            source,
            config,
            current: None,
        }
    }

    /// Create a runner backed by the HTTP analysis service
    pub fn from_config(config: RunnerConfig) -> Result<Self> {
        let client = HttpAnalysisClient::new(&config)?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Start a run for `symbol`, superseding any run in flight
    ///
    /// `on_complete` fires exactly once, after the summary is published,
    /// unless the run is deactivated first. Must be called from within a
    /// tokio runtime.
    pub fn activate<F>(&mut self, symbol: &str, on_complete: F) -> Result<Uuid>
    where
        F: FnOnce() + Send + 'static,
    {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AnalysisError::InvalidSymbol(symbol.to_string()));
        }

        self.deactivate();

        let run_id = Uuid::new_v4();
        let state = RunState::new(run_id, symbol);
        let (updates, receiver) = watch::channel(state.snapshot().clone());
        let token = CancellationToken::new();
        let gate = RunGate::default();

        let task = RevealTask {
            source: Arc::clone(&self.source),
            config: Arc::clone(&self.config),
            token: token.clone(),
            gate: gate.clone(),
            updates,
        };

        info!(%run_id, symbol, "Activating analysis run");
        let span = info_span!("analysis_run", %run_id, symbol);
        let handle = tokio::spawn(task.run(state, Box::new(on_complete)).instrument(span));

        self.current = Some(ActiveRun {
            run_id,
            token,
            gate,
            handle,
            updates: receiver,
        });

        Ok(run_id)
    }

    /// Cancel the current run; returns whether one was still in flight
    ///
    /// The last snapshot stays readable, but no further transitions or
    /// callbacks happen for that run. When this returns `true` the
    /// completion callback is guaranteed never to fire, on any runtime
    /// flavor.
    pub fn deactivate(&mut self) -> bool {
        match &self.current {
            Some(run) => {
                let cancelled = run.cancel();
                if cancelled {
                    info!(run_id = %run.run_id, "Analysis run deactivated");
                }
                cancelled
            }
            None => false,
        }
    }

    /// Latest state of the current run
    pub fn snapshot(&self) -> Option<RunSnapshot> {
        self.current.as_ref().map(|run| run.updates.borrow().clone())
    }

    /// Change feed for the current run
    pub fn subscribe(&self) -> Option<watch::Receiver<RunSnapshot>> {
        self.current.as_ref().map(|run| run.updates.clone())
    }

    /// Id of the current run, if any
    pub fn run_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|run| run.run_id)
    }

    /// Whether a run is in flight and not yet complete
    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|run| {
            !run.token.is_cancelled() && !run.updates.borrow().is_complete()
        })
    }
}

impl Drop for AnalysisRunner {
    fn drop(&mut self) {
        self.deactivate();
    }
}
