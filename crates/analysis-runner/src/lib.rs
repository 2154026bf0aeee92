//! Simulated stock-analysis runs
//!
//! For a ticker symbol, [`AnalysisRunner`] fetches analyst verdicts and an
//! aggregate summary from a local analysis service, falls back to a fixed
//! built-in fixture when the service is unavailable, reveals the verdicts
//! one by one on a timer and finally publishes the summary.
//!
//! # Architecture
//!
//! - `api`: the [`AnalysisSource`] seam, its HTTP implementation and the
//!   fetch-then-fallback branch
//! - `runner`: one cancellable tokio task per run, publishing
//!   [`RunSnapshot`]s through a watch channel
//! - `formatter`: plain-text rendering of a snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use analysis_runner::{AnalysisRunner, DashboardFormatter, RunnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runner = AnalysisRunner::from_config(RunnerConfig::default().with_env()?)?;
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     runner.activate("AAPL", move || {
//!         let _ = tx.send(());
//!     })?;
//!     rx.await?;
//!
//!     if let Some(snapshot) = runner.snapshot() {
//!         println!("{}", DashboardFormatter::default().format_snapshot(&snapshot));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod formatter;
pub mod runner;
pub mod types;

// Re-export main types for convenience
pub use api::{AnalysisSource, FetchOutcome, HttpAnalysisClient, fetch_or_fallback};
pub use config::RunnerConfig;
pub use error::{AnalysisError, Result};
pub use formatter::DashboardFormatter;
pub use runner::{AnalysisRunner, CompletionCallback};
pub use types::{
    AnalysisResponse, AnalysisSummary, AnalystVerdict, DataOrigin, RunPhase, RunSnapshot, Signal,
    VerdictStatus,
};
