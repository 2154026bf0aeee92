//! Terminal dashboard for simulated stock-analysis runs
//!
//! # Usage
//!
//! ```bash
//! # Point at a running analysis service (optional, falls back to built-in data)
//! export ANALYSIS_SERVICE_URL="http://127.0.0.1:5000/run-hedge-fund"
//!
//! cargo run --bin analysis-dashboard -- AAPL
//! ```

use analysis_runner::{AnalysisRunner, DashboardFormatter, RunSnapshot, RunnerConfig};
use anyhow::Context;
use clap::Parser;
use tokio::sync::oneshot;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analysis-dashboard")]
#[command(about = "Reveal analyst verdicts and the aggregate summary for a ticker", long_about = None)]
struct Args {
    /// Ticker symbol to analyze
    symbol: String,

    /// Analysis service endpoint (overrides ANALYSIS_SERVICE_URL)
    #[arg(long)]
    service_url: Option<String>,

    /// Append each update instead of redrawing the screen
    #[arg(long)]
    plain: bool,
}

fn render(formatter: &DashboardFormatter, snapshot: &RunSnapshot, plain: bool) {
    let view = formatter.format_snapshot(snapshot);
    if plain {
        println!("{view}");
    } else {
        // Clear screen and home the cursor
        print!("\x1B[2J\x1B[1;1H{view}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    analysis_utils::init_tracing_with("warn,analysis_runner=info");

    let args = Args::parse();

    let mut builder = RunnerConfig::builder();
    if let Some(url) = args.service_url {
        builder = builder.service_url(url);
    }
    let config = builder.with_env().build()?;
    info!(service_url = %config.service_url, "Starting analysis dashboard");

    let mut runner = AnalysisRunner::from_config(config)?;
    let (done_tx, mut done_rx) = oneshot::channel();
    runner.activate(&args.symbol, move || {
        let _ = done_tx.send(());
    })?;

    let mut updates = runner.subscribe().context("analysis run did not start")?;
    let formatter = DashboardFormatter::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                runner.deactivate();
                println!("\nCancelled.");
                return Ok(());
            }
            _ = &mut done_rx => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&formatter, &snapshot, args.plain);
            }
        }
    }

    if let Some(snapshot) = runner.snapshot() {
        render(&formatter, &snapshot, args.plain);
    }

    Ok(())
}
