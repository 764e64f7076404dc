//! # Composition Subcommand
//!
//! How one agency's footprint is spread across the titles it references.
//!
//! ```bash
//! regtally composition epa
//! regtally composition "Environmental Protection Agency" --date 2023-06-30
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Args;

use regtally_engine::Composition;

use crate::output::{format_words, print_json, print_title_log, OutputFormat};
use crate::settings::{connect, resolve_agency, resolve_config, AnalysisArgs};

/// Arguments for the composition subcommand.
#[derive(Args, Debug)]
pub struct CompositionArgs {
    /// Agency slug or exact name.
    pub agency: String,

    /// Include the per-title log.
    #[arg(long)]
    pub show_log: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Execute the composition subcommand.
///
/// Exits with status 2 when none of the agency's titles could be counted.
pub async fn run_composition(
    args: &CompositionArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<u8> {
    let config = resolve_config(config_path, &args.analysis)?;
    let mut analyzer = connect()?;
    let forest = analyzer.agencies(&config).await?;
    let agency = resolve_agency(&forest, &args.agency)?;

    let composition = analyzer.composition(&config, &agency).await?;
    match format {
        OutputFormat::Json => print_json(composition.as_ref())?,
        OutputFormat::Text => print_text(&composition, args.show_log),
    }

    if composition.has_data() {
        Ok(0)
    } else {
        tracing::warn!(agency = %agency, "no title content could be counted");
        Ok(2)
    }
}

/// Percentage rounded to two decimals for display.
fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn print_text(composition: &Composition, show_log: bool) {
    println!(
        "{} [{}] as of {}",
        composition.name, composition.agency, composition.target_date
    );

    if composition.has_data() {
        println!();
        println!(
            "{:<60} {:>12} {:>14} {:>8}",
            "Title", "Words", "Attributed", "Share"
        );
        for row in &composition.rows {
            println!(
                "{:<60} {:>12} {:>14} {:>8}",
                row.label,
                format_words(row.word_count as f64),
                format_words(row.attributed_words),
                percent(row.percentage)
            );
        }
        println!();
        println!(
            "Total: {} words, {} attributed",
            format_words(composition.total_words as f64),
            format_words(composition.attributed_total())
        );
    } else {
        println!("No title content could be counted for this agency.");
    }

    if !composition.errors.is_empty() {
        println!();
        println!("Titles not counted:");
        for (number, reason) in &composition.errors {
            println!("  Title {number}: {reason}");
        }
    }

    if show_log {
        print_title_log(&composition.log);
    }
}
