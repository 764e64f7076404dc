//! # Snapshot Subcommand
//!
//! Word counts per agency and per title as of one date.
//!
//! ```bash
//! regtally snapshot --max-titles 10
//! regtally snapshot --date 2024-01-01 --senior --top 20
//! regtally --format json snapshot
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Args;

use regtally_engine::{AgencyRow, Snapshot};

use crate::output::{format_words, print_json, print_title_log, OutputFormat};
use crate::settings::{connect, resolve_config, AnalysisArgs};

/// Arguments for the snapshot subcommand.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Only list agencies with no parent.
    #[arg(long)]
    pub senior: bool,

    /// Show at most this many agencies.
    #[arg(long)]
    pub top: Option<usize>,

    /// Include the per-title log.
    #[arg(long)]
    pub show_log: bool,
}

/// Execute the snapshot subcommand.
pub async fn run_snapshot(
    args: &SnapshotArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<u8> {
    let config = resolve_config(config_path, &args.analysis)?;
    let mut analyzer = connect()?;
    let snapshot = analyzer.snapshot(&config).await?;

    match format {
        OutputFormat::Json => print_json(snapshot.as_ref())?,
        OutputFormat::Text => print_text(&snapshot, args),
    }
    Ok(0)
}

fn selected_rows<'a>(snapshot: &'a Snapshot, args: &SnapshotArgs) -> &'a [AgencyRow] {
    let rows = if args.senior {
        &snapshot.senior_agencies
    } else {
        &snapshot.agencies
    };
    match args.top {
        Some(n) => &rows[..n.min(rows.len())],
        None => rows.as_slice(),
    }
}

fn print_text(snapshot: &Snapshot, args: &SnapshotArgs) {
    println!("Snapshot as of {}", snapshot.target_date);
    println!(
        "Counted {} words across {} titles",
        format_words(snapshot.total_words() as f64),
        snapshot.titles.len()
    );
    println!();

    let rows = selected_rows(snapshot, args);
    if rows.is_empty() {
        println!("No agency word counts.");
    } else {
        println!("{:<60} {:>14}", "Agency", "Words");
        for row in rows {
            println!("{:<60} {:>14}", row.name, format_words(row.word_count));
        }
    }

    if !snapshot.titles.is_empty() {
        println!();
        println!("{:<6} {:<50} {:<10} {:>12}", "Title", "Name", "Date", "Words");
        for row in &snapshot.titles {
            println!(
                "{:<6} {:<50} {:<10} {:>12}",
                row.number.get(),
                row.name,
                row.date,
                format_words(row.word_count as f64)
            );
        }
    }

    if !snapshot.unowned_titles.is_empty() {
        let unowned: Vec<String> = snapshot
            .unowned_titles
            .iter()
            .map(|n| n.to_string())
            .collect();
        println!();
        println!("Titles without an owning agency: {}", unowned.join(", "));
    }

    if args.show_log {
        print_title_log(&snapshot.log);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regtally_core::AgencyId;

    fn row(id: &str, words: f64) -> AgencyRow {
        AgencyRow {
            id: AgencyId::new(id).unwrap(),
            name: id.to_uppercase(),
            word_count: words,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            target_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            agencies: vec![row("epa", 500.0), row("fs", 300.0), row("usda", 200.0)],
            senior_agencies: vec![row("epa", 500.0), row("usda", 200.0)],
            titles: Vec::new(),
            log: Vec::new(),
            unowned_titles: Vec::new(),
        }
    }

    fn args(senior: bool, top: Option<usize>) -> SnapshotArgs {
        SnapshotArgs {
            analysis: AnalysisArgs::default(),
            senior,
            top,
            show_log: false,
        }
    }

    #[test]
    fn senior_and_top_select_rows() {
        let snapshot = snapshot();
        assert_eq!(selected_rows(&snapshot, &args(false, None)).len(), 3);
        assert_eq!(selected_rows(&snapshot, &args(true, None)).len(), 2);
        let top = selected_rows(&snapshot, &args(false, Some(1)));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id.as_str(), "epa");
        assert_eq!(selected_rows(&snapshot, &args(true, Some(10))).len(), 2);
    }
}
