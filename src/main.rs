//! This program measures the popularity of programming languages across a
//! decade of Stack Overflow developer surveys, whose results are published at
//! <https://insights.stackoverflow.com/survey>.

mod acquire;
mod chart;
mod config;
mod editions;
mod layout;
mod output;
mod progress;
mod report;
mod summary;
mod table;
mod trend;

use crate::{
    config::Config,
    progress::{ProgressConfig, ProgressReport, Work},
    report::Reports,
    summary::AggregateResult,
};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Track programming language popularity across the 2011-2020 Stack Overflow
/// developer surveys
///
/// Survey results are downloaded to the current directory on first use and
/// reused afterwards. Per-year language statistics are saved to data.json,
/// and the popularity of a few major languages is plotted to languages.svg.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    if let Err(e) = setup_logging() {
        eprintln!("System logging is unavailable, running without logs: {e}");
    }

    // Decode CLI arguments
    let Args {} = Args::parse();
    let config = Config::new(Path::new("."));

    // Set up progress reporting
    let report = ProgressReport::new();

    // Summarize every survey and save the results
    let client = reqwest::Client::new();
    let aggregate = collect_summaries(&config, &client, &report).await?;
    output::save(&config.output_path(), &aggregate).await?;

    // Display the language appearance reports
    {
        let reports = Reports::new(&config.report, &aggregate);
        let stdout = tokio::io::stdout();
        let mut stdout = BufWriter::new(stdout);
        stdout.write_all(reports.to_string().as_bytes()).await?;
        stdout.flush().await?;
    }

    // Plot the popularity of the languages of interest
    let series = trend::build_series(&config.trend_languages, &aggregate)
        .context("building language popularity trends")?;
    chart::render(&config.chart_path(), &series)?;
    Ok(())
}

/// Acquire and summarize every configured survey edition, one after another
async fn collect_summaries(
    config: &Config,
    client: &reqwest::Client,
    report: &ProgressReport,
) -> Result<AggregateResult> {
    let surveys = report.add(
        "Processing surveys",
        ProgressConfig::new(Work::Steps(config.editions.len())).dont_show_rate_eta(),
    );
    let mut aggregate = AggregateResult::new();
    for edition in config.editions.iter() {
        let year = edition.year;
        let path = acquire::ensure_local_survey(client, edition, &config.work_dir, report)
            .await
            .with_context(|| format!("acquiring the {year} survey"))?;

        log::info!("Processing {year} survey from {}", path.display());
        let table = table::read_survey(&path, &edition.layout).await?;
        let summary = summary::summarize(&edition.layout, &table)
            .with_context(|| format!("summarizing the {year} survey"))?;
        if summary.is_empty() {
            log::warn!("Nobody answered the language question of the {year} survey");
        }
        aggregate.insert(year, summary);
        surveys.make_progress(1);
    }
    surveys.finish();
    Ok(aggregate)
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Year of Gregorian Calendar
pub type Year = i16;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
