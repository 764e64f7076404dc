//! # Proportional Attribution
//!
//! Distributes each title's word count across the agencies that own it:
//! a title with `k` owners adds `count / k` to each owner. Titles nobody
//! owns contribute nothing and are listed in
//! [`Attribution::unowned_titles`], which keeps them distinguishable from
//! titles whose content could not be fetched (those never reach this
//! function).
//!
//! ## Determinism
//!
//! Counts are visited in title-number order and owners in traversal order,
//! and nothing is rounded before summation. The same inputs always produce
//! bit-identical totals. Rounding is a presentation concern.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::identity::{AgencyId, TitleNumber};
use crate::ownership::OwnershipIndex;

/// Word counts of the titles processed in one run. A title whose content
/// could not be obtained is absent, never zero.
pub type TitleWordCounts = BTreeMap<TitleNumber, u64>;

/// Per-agency totals produced by [`attribute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attribution {
    totals: BTreeMap<AgencyId, f64>,
    unowned: Vec<TitleNumber>,
}

impl Attribution {
    /// Per-agency totals, ordered by agency id.
    pub fn totals(&self) -> &BTreeMap<AgencyId, f64> {
        &self.totals
    }

    /// Total for one agency, `0.0` when it received nothing.
    pub fn total_for(&self, agency: &AgencyId) -> f64 {
        self.totals.get(agency).copied().unwrap_or(0.0)
    }

    /// Counted titles that no agency owns, in title-number order.
    pub fn unowned_titles(&self) -> &[TitleNumber] {
        &self.unowned
    }

    /// Sum of all agency totals, accumulated in agency-id order.
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Consume into the totals map.
    pub fn into_totals(self) -> BTreeMap<AgencyId, f64> {
        self.totals
    }
}

/// The share one owner receives from a title with `owners` owners.
pub fn share_per_owner(count: u64, owners: usize) -> f64 {
    if owners == 0 {
        return 0.0;
    }
    count as f64 / owners as f64
}

/// Attribute `counts` to agencies through `index`.
pub fn attribute(counts: &TitleWordCounts, index: &OwnershipIndex) -> Attribution {
    let mut attribution = Attribution::default();

    for (&title, &count) in counts {
        let owners = index.owners_of(title);
        if owners.is_empty() {
            tracing::debug!(title = %title, words = count, "title has no owning agency, excluded");
            attribution.unowned.push(title);
            continue;
        }
        let share = share_per_owner(count, owners.len());
        for owner in owners {
            *attribution.totals.entry(owner.clone()).or_insert(0.0) += share;
        }
    }

    attribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agency::Agency;

    fn id(s: &str) -> AgencyId {
        AgencyId::new(s).unwrap()
    }

    fn t(n: u32) -> TitleNumber {
        TitleNumber::new(n).unwrap()
    }

    fn counts(pairs: &[(u32, u64)]) -> TitleWordCounts {
        pairs.iter().map(|&(n, c)| (t(n), c)).collect()
    }

    #[test]
    fn shared_title_splits_evenly() {
        let forest = vec![
            Agency::new(id("a"), "A").with_titles([t(7)]),
            Agency::new(id("b"), "B").with_titles([t(7)]),
            Agency::new(id("c"), "C").with_titles([t(7)]),
        ];
        let index = OwnershipIndex::build(&forest);
        let result = attribute(&counts(&[(7, 900)]), &index);
        assert_eq!(result.total_for(&id("a")), 300.0);
        assert_eq!(result.total_for(&id("b")), 300.0);
        assert_eq!(result.total_for(&id("c")), 300.0);
        assert_eq!(result.grand_total(), 900.0);
    }

    #[test]
    fn fractional_shares_are_not_rounded() {
        let forest = vec![
            Agency::new(id("a"), "A").with_titles([t(1)]),
            Agency::new(id("b"), "B").with_titles([t(1)]),
            Agency::new(id("c"), "C").with_titles([t(1)]),
        ];
        let index = OwnershipIndex::build(&forest);
        let result = attribute(&counts(&[(1, 100)]), &index);
        assert_eq!(result.total_for(&id("a")), 100.0 / 3.0);
    }

    #[test]
    fn unowned_titles_are_excluded_and_reported() {
        let forest = vec![Agency::new(id("a"), "A").with_titles([t(1)])];
        let index = OwnershipIndex::build(&forest);
        let result = attribute(&counts(&[(1, 10), (2, 99)]), &index);
        assert_eq!(result.grand_total(), 10.0);
        assert_eq!(result.unowned_titles(), &[t(2)]);
        assert_eq!(result.totals().len(), 1);
    }

    #[test]
    fn agency_with_no_counted_titles_is_absent() {
        let forest = vec![
            Agency::new(id("a"), "A").with_titles([t(1)]),
            Agency::new(id("b"), "B").with_titles([t(2)]),
        ];
        let index = OwnershipIndex::build(&forest);
        let result = attribute(&counts(&[(1, 10)]), &index);
        assert!(!result.totals().contains_key(&id("b")));
        assert_eq!(result.total_for(&id("b")), 0.0);
    }

    #[test]
    fn share_per_owner_with_no_owners_is_zero() {
        assert_eq!(share_per_owner(10, 0), 0.0);
        assert_eq!(share_per_owner(10, 4), 2.5);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let forest = vec![
            Agency::new(id("a"), "A").with_titles([t(1), t(2), t(3)]),
            Agency::new(id("b"), "B").with_titles([t(2), t(3)]),
            Agency::new(id("c"), "C").with_titles([t(3)]),
        ];
        let index = OwnershipIndex::build(&forest);
        let input = counts(&[(1, 12_345), (2, 777), (3, 1_000_001)]);
        let first = attribute(&input, &index);
        let second = attribute(&input, &index);
        for (agency, total) in first.totals() {
            assert_eq!(total.to_bits(), second.total_for(agency).to_bits());
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::agency::Agency;
    use proptest::prelude::*;

    /// Up to 6 agencies each referencing a subset of titles 1..=12, plus
    /// word counts for a subset of titles 1..=15 (13..=15 are never owned).
    fn scenario() -> impl Strategy<Value = (Vec<Agency>, TitleWordCounts)> {
        let agencies = prop::collection::vec(prop::collection::btree_set(1u32..=12, 0..6), 1..6)
            .prop_map(|refs| {
                refs.into_iter()
                    .enumerate()
                    .map(|(i, titles)| {
                        Agency::new(AgencyId::new(format!("agency-{i}")).unwrap(), format!("Agency {i}"))
                            .with_titles(titles.into_iter().map(|n| TitleNumber::new(n).unwrap()))
                    })
                    .collect::<Vec<_>>()
            });
        let counts = prop::collection::btree_map(1u32..=15, 0u64..2_000_000, 0..15).prop_map(|m| {
            m.into_iter()
                .map(|(n, c)| (TitleNumber::new(n).unwrap(), c))
                .collect::<TitleWordCounts>()
        });
        (agencies, counts)
    }

    proptest! {
        /// Attribution conserves the owned words: nothing lost, nothing duplicated.
        #[test]
        fn sum_equals_owned_words((forest, counts) in scenario()) {
            let index = OwnershipIndex::build(&forest);
            let result = attribute(&counts, &index);
            let owned: u64 = counts
                .iter()
                .filter(|(title, _)| !index.owners_of(**title).is_empty())
                .map(|(_, c)| *c)
                .sum();
            let total = result.grand_total();
            prop_assert!((total - owned as f64).abs() <= 1e-6 * (owned as f64).max(1.0),
                "attributed {total} != owned {owned}");
        }

        /// Each owner of a title receives exactly `count / k` from it.
        #[test]
        fn each_owner_receives_equal_share((forest, counts) in scenario()) {
            let index = OwnershipIndex::build(&forest);
            for (&title, &count) in &counts {
                let single: TitleWordCounts = [(title, count)].into_iter().collect();
                let result = attribute(&single, &index);
                let owners = index.owners_of(title);
                for owner in owners {
                    prop_assert_eq!(result.total_for(owner), count as f64 / owners.len() as f64);
                }
                prop_assert_eq!(result.totals().len(), owners.len());
            }
        }

        /// Unowned titles are reported and only unowned titles are reported.
        #[test]
        fn unowned_titles_are_exactly_the_ownerless_counts((forest, counts) in scenario()) {
            let index = OwnershipIndex::build(&forest);
            let result = attribute(&counts, &index);
            let expected: Vec<TitleNumber> = counts
                .keys()
                .copied()
                .filter(|t| index.owners_of(*t).is_empty())
                .collect();
            prop_assert_eq!(result.unowned_titles(), expected.as_slice());
        }
    }
}
