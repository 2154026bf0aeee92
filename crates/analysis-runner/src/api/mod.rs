//! Data-fetch adapter for the analysis service

pub mod client;
pub mod source;

pub use client::HttpAnalysisClient;
pub use source::{AnalysisSource, FetchOutcome, fetch_or_fallback};

#[cfg(test)]
pub use source::MockAnalysisSource;
