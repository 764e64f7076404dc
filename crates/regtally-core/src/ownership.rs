//! # Title Ownership Index
//!
//! Derived from the agency forest once per analysis:
//!
//! - `agency → titles`: each agency's own direct references. A child's
//!   references are recorded under the child, never propagated to the parent.
//!   Rolling child totals up into parents is left to callers.
//! - `title → agencies`: the exact inverse, built by iterating the forward
//!   map in traversal order. Owner lists are therefore in traversal order,
//!   not sorted. A title nobody references is absent.
//!
//! Keys are [`AgencyId`]s. Display names are kept in a side table and only
//! used for presentation, so two agencies sharing a name never merge.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::agency::Agency;
use crate::hierarchy::DepthFirst;
use crate::identity::{AgencyId, TitleNumber};

/// Forward and inverse title ownership maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    /// Agencies with at least one reference, in first-visit order.
    order: Vec<AgencyId>,
    agency_to_titles: HashMap<AgencyId, BTreeSet<TitleNumber>>,
    title_to_agencies: BTreeMap<TitleNumber, Vec<AgencyId>>,
    names: HashMap<AgencyId, String>,
    top_level: BTreeSet<AgencyId>,
}

impl OwnershipIndex {
    /// Build the index from the catalog forest.
    ///
    /// An id visited more than once keeps its first display name and the
    /// union of all occurrences' references.
    pub fn build(forest: &[Agency]) -> Self {
        let mut index = Self::default();

        for visit in DepthFirst::new(forest) {
            let agency = visit.agency;
            if visit.parent.is_none() {
                index.top_level.insert(agency.id.clone());
            }
            index
                .names
                .entry(agency.id.clone())
                .or_insert_with(|| agency.name.clone());

            if agency.title_references.is_empty() {
                continue;
            }
            if !index.agency_to_titles.contains_key(&agency.id) {
                index.order.push(agency.id.clone());
            }
            index
                .agency_to_titles
                .entry(agency.id.clone())
                .or_default()
                .extend(agency.title_references.iter().copied());
        }

        for id in &index.order {
            if let Some(titles) = index.agency_to_titles.get(id) {
                for title in titles {
                    index
                        .title_to_agencies
                        .entry(*title)
                        .or_default()
                        .push(id.clone());
                }
            }
        }

        tracing::debug!(
            agencies = index.order.len(),
            titles = index.title_to_agencies.len(),
            "built title ownership index"
        );
        index
    }

    /// Titles `agency` references directly, if it references any.
    pub fn titles_for(&self, agency: &AgencyId) -> Option<&BTreeSet<TitleNumber>> {
        self.agency_to_titles.get(agency)
    }

    /// Owners of `title` in traversal order. Empty when nobody owns it.
    pub fn owners_of(&self, title: TitleNumber) -> &[AgencyId] {
        self.title_to_agencies
            .get(&title)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display name of any agency in the forest.
    pub fn name_of(&self, agency: &AgencyId) -> Option<&str> {
        self.names.get(agency).map(String::as_str)
    }

    /// Whether `agency` appears anywhere in the forest.
    pub fn is_known(&self, agency: &AgencyId) -> bool {
        self.names.contains_key(agency)
    }

    /// Whether `agency` is a top-level catalog entry.
    pub fn is_top_level(&self, agency: &AgencyId) -> bool {
        self.top_level.contains(agency)
    }

    /// Agencies that own at least one title, in traversal order.
    pub fn owning_agencies(&self) -> impl Iterator<Item = &AgencyId> {
        self.order.iter()
    }

    /// Every `(title, owners)` pair, ordered by title number.
    pub fn owned_titles(&self) -> impl Iterator<Item = (TitleNumber, &[AgencyId])> {
        self.title_to_agencies
            .iter()
            .map(|(title, owners)| (*title, owners.as_slice()))
    }

    /// Whether no agency references any title.
    pub fn is_empty(&self) -> bool {
        self.title_to_agencies.is_empty()
    }
}
