//! Multi-year time series of attributed word counts.
//!
//! Each year is a snapshot as of `{year}-01-01`, attributed from scratch.
//! Only the retriever's content cache is shared between years, keyed by
//! `(title, date)`, so a title unchanged since an earlier year is fetched
//! once.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use regtally_core::AgencyId;

use crate::error::EngineError;
use crate::tally::TitleLogEntry;

/// `{year}-01-01`.
pub fn year_start(year: i32) -> Result<NaiveDate, EngineError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(EngineError::InvalidYearRange {
        start: year,
        end: year,
    })
}

/// Check an inclusive year range.
pub fn validate_years(start: i32, end: i32) -> Result<(), EngineError> {
    if start > end {
        return Err(EngineError::InvalidYearRange { start, end });
    }
    year_start(start)?;
    year_start(end)?;
    Ok(())
}

/// Attributed totals per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    /// `year -> agency -> words`.
    pub by_year: BTreeMap<i32, BTreeMap<AgencyId, f64>>,
    /// Display names of every agency in [`TimeSeries::by_year`].
    pub names: BTreeMap<AgencyId, String>,
    /// Per-title log of each year.
    pub log: BTreeMap<i32, Vec<TitleLogEntry>>,
}

/// One `(year, agency)` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    /// Year.
    pub year: i32,
    /// Agency.
    pub agency: AgencyId,
    /// Display name.
    pub name: String,
    /// Whole attributed words, fractional part dropped.
    pub word_count: u64,
}

/// One agency across all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    /// Agency.
    pub agency: AgencyId,
    /// Display name.
    pub name: String,
    /// Whole words per year. Years the agency received nothing are absent.
    pub by_year: BTreeMap<i32, u64>,
}

fn whole_words(count: f64) -> u64 {
    count.trunc().max(0.0) as u64
}

impl TimeSeries {
    /// Store one year's totals and log.
    pub fn insert_year(
        &mut self,
        year: i32,
        totals: BTreeMap<AgencyId, f64>,
        names: impl IntoIterator<Item = (AgencyId, String)>,
        log: Vec<TitleLogEntry>,
    ) {
        for (id, name) in names {
            self.names.entry(id).or_insert(name);
        }
        self.by_year.insert(year, totals);
        self.log.insert(year, log);
    }

    /// Years covered.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Every agency with words in any year.
    pub fn agencies(&self) -> BTreeSet<&AgencyId> {
        self.by_year.values().flat_map(|totals| totals.keys()).collect()
    }

    fn selects(selected: &[AgencyId], id: &AgencyId) -> bool {
        selected.is_empty() || selected.contains(id)
    }

    fn name(&self, id: &AgencyId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Flatten into points ordered by year then agency id. An empty
    /// selection means every agency.
    pub fn rows(&self, selected: &[AgencyId]) -> Vec<TrendRow> {
        self.by_year
            .iter()
            .flat_map(|(&year, totals)| {
                totals
                    .iter()
                    .filter(move |(id, _)| Self::selects(selected, id))
                    .map(move |(id, &count)| (year, id, count))
            })
            .map(|(year, id, count)| TrendRow {
                year,
                agency: id.clone(),
                name: self.name(id),
                word_count: whole_words(count),
            })
            .collect()
    }

    /// One row per agency with a column per year, ordered by agency id.
    pub fn pivot(&self, selected: &[AgencyId]) -> Vec<PivotRow> {
        let mut rows: BTreeMap<&AgencyId, BTreeMap<i32, u64>> = BTreeMap::new();
        for (&year, totals) in &self.by_year {
            for (id, &count) in totals {
                if Self::selects(selected, id) {
                    rows.entry(id).or_default().insert(year, whole_words(count));
                }
            }
        }
        rows.into_iter()
            .map(|(id, by_year)| PivotRow {
                agency: id.clone(),
                name: self.name(id),
                by_year,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AgencyId {
        AgencyId::new(s).unwrap()
    }

    fn series() -> TimeSeries {
        let mut ts = TimeSeries::default();
        ts.insert_year(
            2023,
            BTreeMap::from([(id("a"), 100.6), (id("b"), 50.0)]),
            [(id("a"), "Alpha".to_string()), (id("b"), "Beta".to_string())],
            Vec::new(),
        );
        ts.insert_year(
            2024,
            BTreeMap::from([(id("a"), 120.0), (id("c"), 3.3)]),
            [(id("a"), "Alpha".to_string()), (id("c"), "Gamma".to_string())],
            Vec::new(),
        );
        ts
    }

    #[test]
    fn year_range_must_be_ordered() {
        assert!(validate_years(2020, 2024).is_ok());
        assert!(validate_years(2024, 2024).is_ok());
        assert_eq!(
            validate_years(2024, 2020),
            Err(EngineError::InvalidYearRange {
                start: 2024,
                end: 2020
            })
        );
    }

    #[test]
    fn year_start_is_january_first() {
        assert_eq!(year_start(2022).unwrap().to_string(), "2022-01-01");
    }

    #[test]
    fn rows_truncate_and_order() {
        let rows = series().rows(&[]);
        let points: Vec<(i32, &str, u64)> = rows
            .iter()
            .map(|r| (r.year, r.agency.as_str(), r.word_count))
            .collect();
        assert_eq!(
            points,
            vec![(2023, "a", 100), (2023, "b", 50), (2024, "a", 120), (2024, "c", 3)]
        );
        assert_eq!(rows[0].name, "Alpha");
    }

    #[test]
    fn rows_respect_selection() {
        let rows = series().rows(&[id("a")]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.agency == id("a")));
    }

    #[test]
    fn pivot_has_one_row_per_agency() {
        let pivot = series().pivot(&[]);
        assert_eq!(pivot.len(), 3);
        assert_eq!(pivot[0].by_year, BTreeMap::from([(2023, 100), (2024, 120)]));
        assert!(!pivot[1].by_year.contains_key(&2024));
    }

    #[test]
    fn agencies_span_all_years() {
        let ts = series();
        let ids: Vec<&str> = ts.agencies().into_iter().map(|a| a.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(ts.years().collect::<Vec<_>>(), vec![2023, 2024]);
    }
}
