//! Analyst verdicts, summaries and run snapshots

use crate::error::{AnalysisError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Highest confidence value accepted from the service
pub const MAX_CONFIDENCE: u8 = 100;

/// Directional call of an analyst or of the aggregate summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

/// Reveal status of a verdict within a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    #[default]
    Pending,
    Running,
    Complete,
}

/// One analyst's opinion as revealed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystVerdict {
    pub name: String,
    pub signal: Signal,
    pub confidence: u8,
    #[serde(default)]
    pub status: VerdictStatus,
}

impl AnalystVerdict {
    pub fn new(name: impl Into<String>, signal: Signal, confidence: u8) -> Self {
        Self {
            name: name.into(),
            signal,
            confidence,
            status: VerdictStatus::Pending,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == VerdictStatus::Complete
    }
}

/// Aggregated sentiment published at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub sentiment: Signal,
    pub confidence: u8,
    pub action: String,
    pub description: String,
}

/// Body returned by the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysts: Vec<AnalystVerdict>,
    pub summary: AnalysisSummary,
}

impl AnalysisResponse {
    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.analysts.len());
        for analyst in &self.analysts {
            if analyst.confidence > MAX_CONFIDENCE {
                return Err(AnalysisError::SchemaError(format!(
                    "analyst {:?} has confidence {} above {MAX_CONFIDENCE}",
                    analyst.name, analyst.confidence
                )));
            }
            if !seen.insert(analyst.name.as_str()) {
                return Err(AnalysisError::SchemaError(format!(
                    "analyst {:?} appears more than once",
                    analyst.name
                )));
            }
        }

        if self.summary.confidence > MAX_CONFIDENCE {
            return Err(AnalysisError::SchemaError(format!(
                "summary confidence {} above {MAX_CONFIDENCE}",
                self.summary.confidence
            )));
        }

        Ok(())
    }
}

/// Which branch of the fetch fed a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Service,
    Fallback,
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Fetching,
    Revealing,
    Settling,
    Complete,
}

/// Observable state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: Uuid,
    pub symbol: String,
    pub origin: Option<DataOrigin>,
    pub phase: RunPhase,
    pub analysts: Vec<AnalystVerdict>,
    pub progress: f64,
    pub summary: Option<AnalysisSummary>,
    pub started_at: DateTime<Utc>,
}

impl RunSnapshot {
    pub(crate) fn fetching(run_id: Uuid, symbol: impl Into<String>) -> Self {
        Self {
            run_id,
            symbol: symbol.into(),
            origin: None,
            phase: RunPhase::Fetching,
            analysts: Vec::new(),
            progress: 0.0,
            summary: None,
            started_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Complete
    }

    pub fn completed_count(&self) -> usize {
        self.analysts.iter().filter(|a| a.is_complete()).count()
    }

    /// Count completed verdicts by signal as (bullish, bearish, neutral)
    pub fn signal_tally(&self) -> (usize, usize, usize) {
        self.analysts
            .iter()
            .filter(|a| a.is_complete())
            .fold((0, 0, 0), |(bull, bear, neutral), a| match a.signal {
                Signal::Bullish => (bull + 1, bear, neutral),
                Signal::Bearish => (bull, bear + 1, neutral),
                Signal::Neutral => (bull, bear, neutral + 1),
            })
    }
}

/// Progress in percent for `completed` out of `total` verdicts
///
/// An empty run counts as fully progressed.
pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (completed.min(total) as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            sentiment: Signal::Bullish,
            confidence: 80,
            action: "BUY".to_string(),
            description: "Momentum".to_string(),
        }
    }

    #[test]
    fn test_response_deserialization() {
        let body = json!({
            "analysts": [
                { "name": "Warren Buffett", "signal": "BULLISH", "confidence": 88, "status": "complete" },
                { "name": "Valuation", "signal": "NEUTRAL", "confidence": 40 }
            ],
            "summary": {
                "sentiment": "BULLISH",
                "confidence": 80,
                "action": "BUY",
                "description": "Momentum"
            }
        });

        let response: AnalysisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.analysts.len(), 2);
        assert_eq!(response.analysts[0].status, VerdictStatus::Complete);
        assert_eq!(response.analysts[1].status, VerdictStatus::Pending);
        assert_eq!(response.summary, summary());
        assert!(response.validate().is_ok());
    }

    #[test]
    fn test_unknown_signal_rejected() {
        let body = json!({
            "name": "Sentiment", "signal": "STRONG BUY", "confidence": 50, "status": "pending"
        });
        assert!(serde_json::from_value::<AnalystVerdict>(body).is_err());
    }

    #[test]
    fn test_validate_rejects_confidence_above_100() {
        let response = AnalysisResponse {
            analysts: vec![AnalystVerdict::new("Cathie Wood", Signal::Bullish, 140)],
            summary: summary(),
        };
        assert!(matches!(response.validate(), Err(AnalysisError::SchemaError(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let response = AnalysisResponse {
            analysts: vec![
                AnalystVerdict::new("Sentiment", Signal::Bullish, 10),
                AnalystVerdict::new("Sentiment", Signal::Bearish, 20),
            ],
            summary: summary(),
        };
        let err = response.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_progress_percent() {
        assert!((progress_percent(0, 4) - 0.0).abs() < f64::EPSILON);
        assert!((progress_percent(1, 4) - 25.0).abs() < f64::EPSILON);
        assert!((progress_percent(4, 4) - 100.0).abs() < f64::EPSILON);
        assert!((progress_percent(0, 0) - 100.0).abs() < f64::EPSILON);
        assert!((progress_percent(9, 4) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_signal_display_matches_wire_form() {
        assert_eq!(Signal::Bearish.to_string(), "BEARISH");
        assert_eq!(serde_json::to_value(Signal::Neutral).unwrap(), json!("NEUTRAL"));
        assert_eq!(
            serde_json::to_value(VerdictStatus::Running).unwrap(),
            json!("running")
        );
    }

    #[test]
    fn test_signal_tally_counts_completed_only() {
        let mut snapshot = RunSnapshot::fetching(Uuid::new_v4(), "AAPL");
        snapshot.analysts = vec![
            AnalystVerdict::new("A", Signal::Bullish, 10),
            AnalystVerdict::new("B", Signal::Bearish, 20),
            AnalystVerdict::new("C", Signal::Bearish, 30),
        ];
        snapshot.analysts[1].status = VerdictStatus::Complete;
        snapshot.analysts[2].status = VerdictStatus::Complete;

        assert_eq!(snapshot.completed_count(), 2);
        assert_eq!(snapshot.signal_tally(), (0, 2, 0));
    }
}
