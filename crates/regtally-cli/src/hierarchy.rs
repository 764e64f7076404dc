//! # Hierarchy Subcommand
//!
//! Views of the agency forest: indented table, graph, name list, summary.
//!
//! ```bash
//! regtally hierarchy
//! regtally hierarchy --without-parent
//! regtally hierarchy --parent agriculture-department --view graph
//! regtally hierarchy --view names
//! ```

use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};

use regtally_core::hierarchy::{agency_names, graph, table_rows};
use regtally_core::{Agency, HierarchyFilter, HierarchySummary};

use crate::output::{print_json, OutputFormat};
use crate::settings::{connect, resolve_agency, resolve_config, AnalysisArgs};

/// What to show.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HierarchyView {
    /// Indented table, siblings sorted by name.
    #[default]
    Table,
    /// Nodes and parent→child edges.
    Graph,
    /// Every agency name, sorted.
    Names,
    /// Agency counts.
    Summary,
}

/// Arguments for the hierarchy subcommand.
#[derive(Args, Debug)]
pub struct HierarchyArgs {
    /// Only agencies that have no parent and no children.
    #[arg(long, conflicts_with = "parent")]
    pub without_parent: bool,

    /// Only this parent agency (slug or exact name) and its descendants.
    #[arg(long)]
    pub parent: Option<String>,

    /// What to show.
    #[arg(long, value_enum, default_value_t = HierarchyView::Table)]
    pub view: HierarchyView,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn filter_for(args: &HierarchyArgs, forest: &[Agency]) -> Result<HierarchyFilter> {
    if args.without_parent {
        return Ok(HierarchyFilter::WithoutParent);
    }
    match &args.parent {
        Some(input) => Ok(HierarchyFilter::Parent(resolve_agency(forest, input)?)),
        None => Ok(HierarchyFilter::All),
    }
}

/// Execute the hierarchy subcommand.
pub async fn run_hierarchy(
    args: &HierarchyArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<u8> {
    let overrides = AnalysisArgs {
        timeout: args.timeout,
        ..AnalysisArgs::default()
    };
    let config = resolve_config(config_path, &overrides)?;
    let mut analyzer = connect()?;
    let forest = analyzer.agencies(&config).await?;
    let filter = filter_for(args, &forest)?;

    match (args.view, format) {
        (HierarchyView::Table, OutputFormat::Json) => print_json(&table_rows(&forest, &filter))?,
        (HierarchyView::Table, OutputFormat::Text) => {
            let rows = table_rows(&forest, &filter);
            if rows.is_empty() {
                println!("No agencies match the filter.");
            }
            for row in rows {
                let marker = if row.is_parent { "+" } else { " " };
                if row.short_name.is_empty() {
                    println!("{marker} {}  [{}]", row.label, row.id);
                } else {
                    println!("{marker} {} ({})  [{}]", row.label, row.short_name, row.id);
                }
            }
        }
        (HierarchyView::Graph, OutputFormat::Json) => print_json(&graph(&forest, &filter))?,
        (HierarchyView::Graph, OutputFormat::Text) => {
            let g = graph(&forest, &filter);
            println!("{} nodes, {} edges", g.nodes.len(), g.edges.len());
            for (parent, child) in &g.edges {
                println!("  {parent} -> {child}");
            }
        }
        (HierarchyView::Names, OutputFormat::Json) => print_json(&agency_names(&forest))?,
        (HierarchyView::Names, OutputFormat::Text) => {
            for name in agency_names(&forest) {
                println!("{name}");
            }
        }
        (HierarchyView::Summary, OutputFormat::Json) => print_json(&HierarchySummary::of(&forest))?,
        (HierarchyView::Summary, OutputFormat::Text) => {
            let summary = HierarchySummary::of(&forest);
            println!("Total agencies:       {}", summary.total);
            println!("Parent agencies:      {}", summary.parents);
            println!("Independent agencies: {}", summary.independent);
        }
    }

    Ok(0)
}
