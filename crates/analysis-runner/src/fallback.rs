//! Built-in data used when the analysis service cannot be reached

use crate::types::{AnalysisSummary, AnalystVerdict, Signal};

const FALLBACK_ANALYSTS: [(&str, Signal, u8); 12] = [
    ("Ben Graham", Signal::Bearish, 70),
    ("Bill Ackman", Signal::Bearish, 20),
    ("Cathie Wood", Signal::Bearish, 75),
    ("Charlie Munger", Signal::Neutral, 65),
    ("Fundamentals", Signal::Bullish, 50),
    ("Sentiment", Signal::Bearish, 58),
    ("Stanley Druckenmiller", Signal::Neutral, 60),
    ("Technical Analyst", Signal::Neutral, 18),
    ("Valuation", Signal::Bearish, 76),
    ("Warren Buffett", Signal::Bearish, 75),
    ("Risk Management", Signal::Neutral, 45),
    ("Portfolio Management", Signal::Bearish, 62),
];

const FALLBACK_DESCRIPTION: &str = "Based on the analysis from multiple perspectives, \
maintaining a HOLD position is recommended. The majority of analysts indicate bearish \
signals, but current market conditions suggest waiting for a better entry/exit point.";

/// The twelve fallback analysts, all pending
pub fn fallback_analysts() -> Vec<AnalystVerdict> {
    FALLBACK_ANALYSTS
        .iter()
        .map(|&(name, signal, confidence)| AnalystVerdict::new(name, signal, confidence))
        .collect()
}

/// The summary published by every fallback run
pub fn fallback_summary() -> AnalysisSummary {
    AnalysisSummary {
        sentiment: Signal::Bearish,
        confidence: 72,
        action: "HOLD".to_string(),
        description: FALLBACK_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisResponse, VerdictStatus};

    #[test]
    fn test_fallback_analysts() {
        let analysts = fallback_analysts();
        assert_eq!(analysts.len(), 12);
        assert_eq!(analysts[0].name, "Ben Graham");
        assert_eq!(analysts[4].signal, Signal::Bullish);
        assert_eq!(analysts[7].confidence, 18);
        assert_eq!(analysts[11].name, "Portfolio Management");
        assert!(analysts.iter().all(|a| a.status == VerdictStatus::Pending));
    }

    #[test]
    fn test_fallback_is_a_valid_response() {
        let response = AnalysisResponse {
            analysts: fallback_analysts(),
            summary: fallback_summary(),
        };
        assert!(response.validate().is_ok());
    }

    #[test]
    fn test_fallback_summary() {
        let summary = fallback_summary();
        assert_eq!(summary.sentiment, Signal::Bearish);
        assert_eq!(summary.confidence, 72);
        assert_eq!(summary.action, "HOLD");
        assert!(summary.description.starts_with("Based on the analysis"));
        assert!(summary.description.ends_with("entry/exit point."));
    }
}
