//! Source abstraction and the fetch-then-fallback branch

use crate::error::Result;
use crate::fallback::{fallback_analysts, fallback_summary};
use crate::types::{AnalysisResponse, AnalysisSummary, AnalystVerdict, DataOrigin, VerdictStatus};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Anything that can produce analyst verdicts for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Fetch verdicts and summary for one ticker
    async fn fetch(&self, symbol: &str) -> Result<AnalysisResponse>;
}

/// Data a run reveals, tagged with the branch that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub origin: DataOrigin,
    pub analysts: Vec<AnalystVerdict>,
    pub summary: AnalysisSummary,
}

impl FetchOutcome {
    /// Wrap a service response; every analyst starts the run pending
    pub fn from_service(response: AnalysisResponse) -> Self {
        let analysts = response
            .analysts
            .into_iter()
            .map(|analyst| AnalystVerdict {
                status: VerdictStatus::Pending,
                ..analyst
            })
            .collect();

        Self {
            origin: DataOrigin::Service,
            analysts,
            summary: response.summary,
        }
    }

    /// The fixed fallback data
    pub fn fallback() -> Self {
        Self {
            origin: DataOrigin::Fallback,
            analysts: fallback_analysts(),
            summary: fallback_summary(),
        }
    }
}

/// Make the single fetch attempt, substituting fallback data on any failure
pub async fn fetch_or_fallback(source: &dyn AnalysisSource, symbol: &str) -> FetchOutcome {
    match source.fetch(symbol).await {
        Ok(response) => {
            debug!(symbol, analysts = response.analysts.len(), "Fetched analysis from service");
            FetchOutcome::from_service(response)
        }
        Err(err) => {
            warn!(symbol, error = %err, "Failed to fetch analysis, using fallback data");
            FetchOutcome::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::types::Signal;
    use mockall::predicate::eq;
    use std::time::Duration;

    fn service_response() -> AnalysisResponse {
        let mut running = AnalystVerdict::new("Cathie Wood", Signal::Bullish, 91);
        running.status = VerdictStatus::Running;
        AnalysisResponse {
            analysts: vec![running, AnalystVerdict::new("Valuation", Signal::Neutral, 33)],
            summary: AnalysisSummary {
                sentiment: Signal::Bullish,
                confidence: 64,
                action: "BUY".to_string(),
                description: "Growth outweighs valuation risk".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_success_uses_service_data() {
        let mut source = MockAnalysisSource::new();
        source
            .expect_fetch()
            .with(eq("TSLA"))
            .times(1)
            .returning(|_| Ok(service_response()));

        let outcome = fetch_or_fallback(&source, "TSLA").await;
        assert_eq!(outcome.origin, DataOrigin::Service);
        assert_eq!(outcome.analysts.len(), 2);
        assert_eq!(outcome.summary.action, "BUY");
        assert!(
            outcome
                .analysts
                .iter()
                .all(|a| a.status == VerdictStatus::Pending)
        );
    }

    #[tokio::test]
    async fn test_failure_substitutes_fallback() {
        let mut source = MockAnalysisSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Err(AnalysisError::Timeout(Duration::from_secs(10))));

        let outcome = fetch_or_fallback(&source, "AAPL").await;
        assert_eq!(outcome, FetchOutcome::fallback());
        assert_eq!(outcome.analysts.len(), 12);
        assert_eq!(outcome.summary, fallback_summary());
    }
}
