//! # Agency Hierarchy Traversal
//!
//! Flattening and search utilities over the agency forest, used for tabular
//! and graph presentation:
//!
//! - [`DepthFirst`]: pre-order walk in catalog order with depth and parent.
//! - [`parent_agencies`] / [`independent_agencies`]: category detection.
//! - [`table_rows`]: indented depth-first rows, siblings sorted by name.
//! - [`graph`]: nodes plus parent→child edges.
//!
//! Every walk uses an explicit stack. Catalog nesting depth never touches the
//! call stack.

use std::collections::HashSet;

use serde::Serialize;

use crate::agency::Agency;
use crate::identity::AgencyId;

// ---------------------------------------------------------------------------
// Depth-first walk
// ---------------------------------------------------------------------------

/// One step of a [`DepthFirst`] walk.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The visited agency.
    pub agency: &'a Agency,
    /// Its parent, `None` for top-level catalog entries.
    pub parent: Option<&'a Agency>,
    /// 0 for top-level entries.
    pub depth: usize,
}

/// Pre-order depth-first iterator over a forest, in catalog order.
#[derive(Debug)]
pub struct DepthFirst<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> DepthFirst<'a> {
    /// Walk every agency in `forest` and all of its descendants.
    pub fn new(forest: &'a [Agency]) -> Self {
        let stack = forest
            .iter()
            .rev()
            .map(|agency| Visit {
                agency,
                parent: None,
                depth: 0,
            })
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        for child in visit.agency.children.iter().rev() {
            self.stack.push(Visit {
                agency: child,
                parent: Some(visit.agency),
                depth: visit.depth + 1,
            });
        }
        Some(visit)
    }
}

/// Find the first agency with `id` anywhere in the forest.
pub fn find_agency<'a>(forest: &'a [Agency], id: &AgencyId) -> Option<&'a Agency> {
    DepthFirst::new(forest)
        .map(|v| v.agency)
        .find(|a| &a.id == id)
}

/// Every agency whose display name equals `name`, in catalog order.
///
/// Display names are not unique, so callers resolving a user-supplied name
/// must handle more than one match.
pub fn find_by_name<'a>(forest: &'a [Agency], name: &str) -> Vec<&'a Agency> {
    DepthFirst::new(forest)
        .map(|v| v.agency)
        .filter(|a| a.name == name)
        .collect()
}

/// Every distinct agency name in the forest, sorted.
pub fn agency_names(forest: &[Agency]) -> Vec<&str> {
    let mut names: Vec<&str> = DepthFirst::new(forest).map(|v| v.agency.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Agencies that have at least one child, at any depth, in catalog order.
pub fn parent_agencies(forest: &[Agency]) -> Vec<&Agency> {
    DepthFirst::new(forest)
        .map(|v| v.agency)
        .filter(|a| a.has_children())
        .collect()
}

/// Childless agencies that are not listed as the child of any agency.
///
/// Child membership is collected at every depth, so a slug that appears both
/// as a top-level entry and nested under a parent is not independent.
pub fn independent_agencies(forest: &[Agency]) -> Vec<&Agency> {
    let child_ids: HashSet<&AgencyId> = DepthFirst::new(forest)
        .filter(|v| v.parent.is_some())
        .map(|v| &v.agency.id)
        .collect();

    DepthFirst::new(forest)
        .map(|v| v.agency)
        .filter(|a| !a.has_children() && !child_ids.contains(&a.id))
        .collect()
}

/// Agency counts by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HierarchySummary {
    /// Every node in the forest.
    pub total: usize,
    /// Nodes with at least one child.
    pub parents: usize,
    /// See [`independent_agencies`].
    pub independent: usize,
}

impl HierarchySummary {
    /// Count the categories of `forest`.
    pub fn of(forest: &[Agency]) -> Self {
        Self {
            total: DepthFirst::new(forest).count(),
            parents: parent_agencies(forest).len(),
            independent: independent_agencies(forest).len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// Which part of the forest a view covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyFilter {
    /// The whole forest.
    All,
    /// Only [`independent_agencies`].
    WithoutParent,
    /// One parent agency and its descendants.
    Parent(AgencyId),
}

/// One row of the hierarchy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyRow {
    /// Name indented by two spaces per level.
    pub label: String,
    /// Depth relative to the view root.
    pub level: usize,
    /// Catalog slug.
    pub id: AgencyId,
    /// Display name.
    pub name: String,
    /// Abbreviation, empty when absent.
    pub short_name: String,
    /// Whether the agency has children.
    pub is_parent: bool,
}

impl HierarchyRow {
    fn new(agency: &Agency, level: usize) -> Self {
        Self {
            label: format!("{}{}", "  ".repeat(level), agency.name),
            level,
            id: agency.id.clone(),
            name: agency.name.clone(),
            short_name: agency.short_name_or_empty().to_string(),
            is_parent: agency.has_children(),
        }
    }
}

fn sorted_by_name<'a>(agencies: impl IntoIterator<Item = &'a Agency>) -> Vec<&'a Agency> {
    let mut sorted: Vec<&Agency> = agencies.into_iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    sorted
}

fn push_rows_sorted(root: &Agency, rows: &mut Vec<HierarchyRow>) {
    let mut stack: Vec<(&Agency, usize)> = vec![(root, 0)];
    while let Some((agency, level)) = stack.pop() {
        rows.push(HierarchyRow::new(agency, level));
        for child in sorted_by_name(&agency.children).into_iter().rev() {
            stack.push((child, level + 1));
        }
    }
}

/// Depth-first table rows for the filtered view. Siblings are sorted by name.
///
/// A [`HierarchyFilter::Parent`] naming an unknown or childless agency yields
/// no rows.
pub fn table_rows(forest: &[Agency], filter: &HierarchyFilter) -> Vec<HierarchyRow> {
    let mut rows = Vec::new();
    match filter {
        HierarchyFilter::All => {
            for agency in sorted_by_name(forest) {
                push_rows_sorted(agency, &mut rows);
            }
        }
        HierarchyFilter::WithoutParent => {
            for agency in sorted_by_name(independent_agencies(forest)) {
                rows.push(HierarchyRow::new(agency, 0));
            }
        }
        HierarchyFilter::Parent(id) => {
            if let Some(agency) = parent_agencies(forest).into_iter().find(|a| &a.id == id) {
                push_rows_sorted(agency, &mut rows);
            }
        }
    }
    rows
}

/// A node of the hierarchy graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    /// Catalog slug.
    pub id: AgencyId,
    /// Display name.
    pub name: String,
    /// Abbreviation, empty when absent.
    pub short_name: String,
    /// Whether the agency has children.
    pub is_parent: bool,
}

/// Nodes and parent→child edges of the filtered view, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyGraph {
    /// Every agency in the view.
    pub nodes: Vec<HierarchyNode>,
    /// `(parent, child)` pairs.
    pub edges: Vec<(AgencyId, AgencyId)>,
}

impl HierarchyGraph {
    fn push_subtree(&mut self, root: &Agency) {
        let roots = std::slice::from_ref(root);
        for visit in DepthFirst::new(roots) {
            self.nodes.push(HierarchyNode {
                id: visit.agency.id.clone(),
                name: visit.agency.name.clone(),
                short_name: visit.agency.short_name_or_empty().to_string(),
                is_parent: visit.agency.has_children(),
            });
            if let Some(parent) = visit.parent {
                self.edges.push((parent.id.clone(), visit.agency.id.clone()));
            }
        }
    }
}

/// Build the graph for the filtered view.
pub fn graph(forest: &[Agency], filter: &HierarchyFilter) -> HierarchyGraph {
    let mut graph = HierarchyGraph::default();
    match filter {
        HierarchyFilter::All => {
            for agency in forest {
                graph.push_subtree(agency);
            }
        }
        HierarchyFilter::WithoutParent => {
            for agency in independent_agencies(forest) {
                graph.push_subtree(agency);
            }
        }
        HierarchyFilter::Parent(id) => {
            if let Some(agency) = parent_agencies(forest).into_iter().find(|a| &a.id == id) {
                graph.push_subtree(agency);
            }
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agency(id: &str, name: &str) -> Agency {
        Agency::new(AgencyId::new(id).unwrap(), name)
    }

    /// usda ─┬─ fs
    ///       └─ aphis ── ppq
    /// epa
    /// doe ── nrc
    fn forest() -> Vec<Agency> {
        vec![
            agency("usda", "Agriculture Department").with_children([
                agency("fs", "Forest Service"),
                agency("aphis", "Animal and Plant Health Inspection Service")
                    .with_children([agency("ppq", "Plant Protection and Quarantine")]),
            ]),
            agency("epa", "Environmental Protection Agency").with_short_name("EPA"),
            agency("doe", "Energy Department").with_children([agency("nrc", "Nuclear Regulatory")]),
        ]
    }

    fn ids<'a>(agencies: impl IntoIterator<Item = &'a Agency>) -> Vec<&'a str> {
        agencies.into_iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn depth_first_is_preorder_in_catalog_order() {
        let f = forest();
        let visits: Vec<(&str, usize, Option<&str>)> = DepthFirst::new(&f)
            .map(|v| (v.agency.id.as_str(), v.depth, v.parent.map(|p| p.id.as_str())))
            .collect();
        assert_eq!(
            visits,
            vec![
                ("usda", 0, None),
                ("fs", 1, Some("usda")),
                ("aphis", 1, Some("usda")),
                ("ppq", 2, Some("aphis")),
                ("epa", 0, None),
                ("doe", 0, None),
                ("nrc", 1, Some("doe")),
            ]
        );
    }

    #[test]
    fn depth_first_handles_deep_nesting_without_recursion() {
        let mut node = agency("leaf", "Leaf");
        for i in 0..10_000 {
            node = agency(&format!("n{i}"), "Nested").with_children([node]);
        }
        let f = vec![node];
        assert_eq!(DepthFirst::new(&f).count(), 10_001);
        // Dropping the deeply nested tree is recursive in std; keep it alive
        // past the assertion and leak it to avoid blowing the test stack.
        std::mem::forget(f);
    }

    #[test]
    fn parents_include_nested_parents() {
        let f = forest();
        assert_eq!(ids(parent_agencies(&f)), vec!["usda", "aphis", "doe"]);
    }

    #[test]
    fn independent_agencies_are_top_level_leaves() {
        let f = forest();
        assert_eq!(ids(independent_agencies(&f)), vec!["epa"]);
    }

    #[test]
    fn top_level_leaf_also_listed_as_child_is_not_independent() {
        let mut f = forest();
        f.push(agency("ppq", "Plant Protection and Quarantine"));
        assert_eq!(ids(independent_agencies(&f)), vec!["epa"]);
    }

    #[test]
    fn summary_counts_every_node() {
        let summary = HierarchySummary::of(&forest());
        assert_eq!(
            summary,
            HierarchySummary {
                total: 7,
                parents: 3,
                independent: 1
            }
        );
    }

    #[test]
    fn table_rows_all_sorted_by_name_and_indented() {
        let rows = table_rows(&forest(), &HierarchyFilter::All);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Agriculture Department",
                "  Animal and Plant Health Inspection Service",
                "    Plant Protection and Quarantine",
                "  Forest Service",
                "Energy Department",
                "  Nuclear Regulatory",
                "Environmental Protection Agency",
            ]
        );
        assert_eq!(rows[2].level, 2);
        assert!(rows[0].is_parent);
        assert_eq!(rows[6].short_name, "EPA");
    }

    #[test]
    fn table_rows_without_parent() {
        let rows = table_rows(&forest(), &HierarchyFilter::WithoutParent);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_str(), "epa");
        assert_eq!(rows[0].level, 0);
    }

    #[test]
    fn table_rows_single_parent_subtree() {
        let filter = HierarchyFilter::Parent(AgencyId::new("aphis").unwrap());
        let rows = table_rows(&forest(), &filter);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["aphis", "ppq"]);
        assert_eq!(rows[0].level, 0);
    }

    #[test]
    fn table_rows_unknown_parent_is_empty() {
        let filter = HierarchyFilter::Parent(AgencyId::new("epa").unwrap());
        assert!(table_rows(&forest(), &filter).is_empty());
    }

    #[test]
    fn graph_edges_follow_tree() {
        let g = graph(&forest(), &HierarchyFilter::All);
        assert_eq!(g.nodes.len(), 7);
        let edges: Vec<(&str, &str)> = g
            .edges
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_str()))
            .collect();
        assert_eq!(
            edges,
            vec![("usda", "fs"), ("usda", "aphis"), ("aphis", "ppq"), ("doe", "nrc")]
        );
    }

    #[test]
    fn graph_parent_view_has_no_edge_above_root() {
        let filter = HierarchyFilter::Parent(AgencyId::new("doe").unwrap());
        let g = graph(&forest(), &filter);
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn find_helpers() {
        let f = forest();
        let ppq = AgencyId::new("ppq").unwrap();
        assert_eq!(find_agency(&f, &ppq).map(|a| a.name.as_str()), Some("Plant Protection and Quarantine"));
        assert!(find_agency(&f, &AgencyId::new("nope").unwrap()).is_none());
        assert_eq!(find_by_name(&f, "Forest Service").len(), 1);
    }

    #[test]
    fn agency_names_sorted_and_deduplicated() {
        let mut f = forest();
        f.push(agency("fs-2", "Forest Service"));
        let names = agency_names(&f);
        assert_eq!(names.first(), Some(&"Agriculture Department"));
        assert_eq!(names.iter().filter(|n| **n == "Forest Service").count(), 1);
        assert_eq!(names.len(), 7);
    }
}
