//! Single-date snapshot of regulatory word counts per agency.

use chrono::NaiveDate;
use serde::Serialize;

use regtally_core::{attribute, AgencyId, Attribution, OwnershipIndex, TitleNumber};

use crate::tally::{TitleLogEntry, TitleRow, TitleTally};

/// Attributed words of one agency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyRow {
    /// Agency.
    pub id: AgencyId,
    /// Display name.
    pub name: String,
    /// Attributed words. Fractional when titles are shared.
    pub word_count: f64,
}

/// Per-agency rows of an attribution, most words first, ties by id.
pub fn agency_rows(attribution: &Attribution, index: &OwnershipIndex) -> Vec<AgencyRow> {
    let mut rows: Vec<AgencyRow> = attribution
        .totals()
        .iter()
        .map(|(id, &word_count)| AgencyRow {
            id: id.clone(),
            name: index.name_of(id).unwrap_or(id.as_str()).to_string(),
            word_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.word_count
            .total_cmp(&a.word_count)
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}

/// Result of a snapshot run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Date the run was "as of".
    pub target_date: NaiveDate,
    /// Every agency that received words.
    pub agencies: Vec<AgencyRow>,
    /// The subset of [`Snapshot::agencies`] that are top-level catalog entries.
    pub senior_agencies: Vec<AgencyRow>,
    /// Counted titles.
    pub titles: Vec<TitleRow>,
    /// Every title considered, in catalog order.
    pub log: Vec<TitleLogEntry>,
    /// Counted titles no agency owns. Their words are in no agency total.
    pub unowned_titles: Vec<TitleNumber>,
}

impl Snapshot {
    /// Attribute a tally and build the result tables.
    pub fn assemble(target_date: NaiveDate, tally: TitleTally, index: &OwnershipIndex) -> Self {
        let attribution = attribute(&tally.counts, index);
        let agencies = agency_rows(&attribution, index);
        let senior_agencies = agencies
            .iter()
            .filter(|row| index.is_top_level(&row.id))
            .cloned()
            .collect();
        Self {
            target_date,
            agencies,
            senior_agencies,
            titles: tally.counted_rows(),
            unowned_titles: attribution.unowned_titles().to_vec(),
            log: tally.log,
        }
    }

    /// Words across all counted titles, owned or not.
    pub fn total_words(&self) -> u64 {
        self.titles.iter().map(|row| row.word_count).sum()
    }

    /// Words attributed to agencies.
    pub fn attributed_words(&self) -> f64 {
        self.agencies.iter().map(|row| row.word_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::TitleStatus;
    use regtally_core::Agency;

    fn id(s: &str) -> AgencyId {
        AgencyId::new(s).unwrap()
    }

    fn t(n: u32) -> TitleNumber {
        TitleNumber::new(n).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn forest() -> Vec<Agency> {
        vec![
            Agency::new(id("usda"), "Department of Agriculture")
                .with_titles([t(2)])
                .with_children([Agency::new(id("aphis"), "APHIS").with_titles([t(9)])]),
            Agency::new(id("fec"), "Federal Election Commission").with_titles([t(11)]),
        ]
    }

    fn tally(counts: &[(u32, u64)]) -> TitleTally {
        let mut tally = TitleTally::default();
        for &(n, words) in counts {
            tally.push(t(n), "T", Some(day()), TitleStatus::Counted { word_count: words });
        }
        tally
    }

    #[test]
    fn senior_view_keeps_only_top_level_agencies() {
        let index = OwnershipIndex::build(&forest());
        let snap = Snapshot::assemble(day(), tally(&[(2, 10), (9, 500), (11, 40)]), &index);

        let all: Vec<&str> = snap.agencies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(all, vec!["aphis", "fec", "usda"]);
        let senior: Vec<&str> = snap.senior_agencies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(senior, vec!["fec", "usda"]);
    }

    #[test]
    fn parent_totals_do_not_roll_up_children() {
        let index = OwnershipIndex::build(&forest());
        let snap = Snapshot::assemble(day(), tally(&[(2, 10), (9, 500)]), &index);
        let usda = snap.agencies.iter().find(|r| r.id.as_str() == "usda").unwrap();
        assert_eq!(usda.word_count, 10.0);
        assert_eq!(usda.name, "Department of Agriculture");
    }

    #[test]
    fn unowned_titles_are_reported_and_excluded() {
        let index = OwnershipIndex::build(&forest());
        let snap = Snapshot::assemble(day(), tally(&[(2, 10), (50, 1000)]), &index);
        assert_eq!(snap.unowned_titles, vec![t(50)]);
        assert_eq!(snap.total_words(), 1010);
        assert_eq!(snap.attributed_words(), 10.0);
    }

    #[test]
    fn agency_rows_break_ties_by_id() {
        let index = OwnershipIndex::build(&forest());
        let snap = Snapshot::assemble(day(), tally(&[(9, 7), (11, 7)]), &index);
        let order: Vec<&str> = snap.agencies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["aphis", "fec"]);
    }
}
