//! Terminal rendering of run snapshots

use crate::types::{DataOrigin, RunSnapshot, VerdictStatus};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

/// Renders a [`RunSnapshot`] as plain text
#[derive(Debug, Clone)]
pub struct DashboardFormatter {
    bar_width: usize,
}

impl Default for DashboardFormatter {
    fn default() -> Self {
        Self { bar_width: 40 }
    }
}

impl DashboardFormatter {
    pub fn new(bar_width: usize) -> Self {
        Self {
            bar_width: bar_width.max(1),
        }
    }

    /// Full view: header, progress, revealed verdicts and, once published, the summary
    pub fn format_snapshot(&self, snapshot: &RunSnapshot) -> String {
        let mut output = String::new();

        let origin = match snapshot.origin {
            Some(DataOrigin::Service) => "live analysis",
            Some(DataOrigin::Fallback) => "fallback data",
            None => "fetching",
        };
        output.push_str(&format!("{} ({origin})\n", snapshot.symbol));
        output.push_str(&self.format_progress(snapshot.progress));
        output.push('\n');

        if let Some(table) = format_verdicts(snapshot) {
            output.push_str(&table);
            output.push('\n');
            let (bullish, bearish, neutral) = snapshot.signal_tally();
            output.push_str(&format!(
                "{bullish} bullish, {bearish} bearish, {neutral} neutral\n"
            ));
        }

        if let Some(summary) = format_summary(snapshot) {
            output.push('\n');
            output.push_str(&summary);
        }

        output
    }

    /// Progress bar such as `[##########----------]  50%`
    pub fn format_progress(&self, progress: f64) -> String {
        let progress = progress.clamp(0.0, 100.0);
        let filled = ((progress / 100.0) * self.bar_width as f64).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(self.bar_width - filled),
            progress
        )
    }
}

/// Table of analysts that have left the pending state
fn format_verdicts(snapshot: &RunSnapshot) -> Option<String> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Analyst", "Status", "Signal", "Confidence"]);

    let mut rows = 0;
    for analyst in &snapshot.analysts {
        let row = match analyst.status {
            VerdictStatus::Pending => continue,
            VerdictStatus::Running => vec![
                analyst.name.clone(),
                "analyzing".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
            VerdictStatus::Complete => vec![
                analyst.name.clone(),
                "done".to_string(),
                analyst.signal.to_string(),
                format!("{}%", analyst.confidence),
            ],
        };
        table.add_row(row);
        rows += 1;
    }

    (rows > 0).then(|| table.to_string())
}

fn format_summary(snapshot: &RunSnapshot) -> Option<String> {
    let summary = snapshot.summary.as_ref()?;
    Some(format!(
        "Analysis Summary for {}\n\
         Overall Sentiment   {}\n\
         Confidence Level    {}%\n\
         Recommended Action  {}\n\n\
         {}\n",
        snapshot.symbol, summary.sentiment, summary.confidence, summary.action, summary.description
    ))
}
