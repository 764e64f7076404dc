//! # Trend Subcommand
//!
//! Agency word counts for each year in a range, as of January 1st.
//!
//! ```bash
//! regtally trend --start 2020 --end 2024
//! regtally trend --start 2022 --end 2024 --agency epa --agency usda --pivot
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Args;

use regtally_core::AgencyId;
use regtally_engine::TimeSeries;

use crate::output::{format_words, print_json, print_title_log, OutputFormat};
use crate::settings::{connect, resolve_agency, resolve_config, AnalysisArgs};

/// Arguments for the trend subcommand.
#[derive(Args, Debug)]
pub struct TrendArgs {
    /// First year, inclusive.
    #[arg(long)]
    pub start: i32,

    /// Last year, inclusive.
    #[arg(long)]
    pub end: i32,

    /// Restrict output to these agencies (slug or exact name). Repeatable.
    #[arg(long = "agency")]
    pub agencies: Vec<String>,

    /// One row per agency with a column per year.
    #[arg(long)]
    pub pivot: bool,

    /// Include the per-year title logs.
    #[arg(long)]
    pub show_log: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Execute the trend subcommand.
pub async fn run_trend(
    args: &TrendArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<u8> {
    let config = resolve_config(config_path, &args.analysis)?;
    let mut analyzer = connect()?;

    let selected = if args.agencies.is_empty() {
        Vec::new()
    } else {
        let forest = analyzer.agencies(&config).await?;
        args.agencies
            .iter()
            .map(|input| resolve_agency(&forest, input))
            .collect::<Result<Vec<AgencyId>>>()?
    };

    let series = analyzer.time_series(&config, args.start, args.end).await?;

    match (format, args.pivot) {
        (OutputFormat::Json, true) => print_json(&series.pivot(&selected))?,
        (OutputFormat::Json, false) => print_json(&series.rows(&selected))?,
        (OutputFormat::Text, true) => print_pivot(&series, &selected),
        (OutputFormat::Text, false) => print_rows(&series, &selected),
    }

    if args.show_log && format == OutputFormat::Text {
        for (year, log) in &series.log {
            println!();
            println!("{year}:");
            print_title_log(log);
        }
    }
    Ok(0)
}

fn print_rows(series: &TimeSeries, selected: &[AgencyId]) {
    let rows = series.rows(selected);
    if rows.is_empty() {
        println!("No agency word counts in range.");
        return;
    }
    println!("{:<6} {:<60} {:>14}", "Year", "Agency", "Words");
    for row in rows {
        println!(
            "{:<6} {:<60} {:>14}",
            row.year,
            row.name,
            format_words(row.word_count as f64)
        );
    }
}

fn print_pivot(series: &TimeSeries, selected: &[AgencyId]) {
    let years: Vec<i32> = series.years().collect();
    let mut header = format!("{:<60}", "Agency");
    for year in &years {
        header.push_str(&format!(" {year:>12}"));
    }
    println!("{header}");

    for row in series.pivot(selected) {
        let mut line = format!("{:<60}", row.name);
        for year in &years {
            let cell = row
                .by_year
                .get(year)
                .map(|&count| format_words(count as f64))
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>12}"));
        }
        println!("{line}");
    }
}
