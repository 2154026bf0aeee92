//! Analysis runner
//!
//! Each activation spawns one reveal task that owns the run state and
//! publishes snapshots through a watch channel.

mod analysis_runner;
mod gate;
mod reveal;
mod state;

pub use analysis_runner::AnalysisRunner;
pub use reveal::CompletionCallback;
