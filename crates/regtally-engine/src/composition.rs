//! Composition of one agency's regulatory footprint across its titles.
//!
//! Every title the agency references is processed, with no cap. The
//! percentage of a title is its raw word count over the sum of raw counts
//! of the agency's successfully counted titles, so percentages sum to 100
//! whenever at least one title was counted. Each row also carries the share
//! the agency is attributed when the title is split among its owners.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use regtally_core::attribution::share_per_owner;
use regtally_core::{AgencyId, OwnershipIndex, TitleNumber};

use crate::tally::{TitleLogEntry, TitleTally};

/// One title of the agency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    /// Title.
    pub number: TitleNumber,
    /// `Title {n}: {name}`.
    pub label: String,
    /// Raw words in the title.
    pub word_count: u64,
    /// Words attributed to this agency after splitting among owners.
    pub attributed_words: f64,
    /// `word_count / total_words × 100`.
    pub percentage: f64,
}

/// Result of a composition run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    /// Agency analysed.
    pub agency: AgencyId,
    /// Display name.
    pub name: String,
    /// Date the run was "as of".
    pub target_date: NaiveDate,
    /// Sum of raw words of counted titles.
    pub total_words: u64,
    /// Counted titles, largest share first, ties by title number.
    pub rows: Vec<CompositionRow>,
    /// Titles that yielded no text, with the reason.
    pub errors: BTreeMap<TitleNumber, String>,
    /// Every title considered.
    pub log: Vec<TitleLogEntry>,
}

impl Composition {
    /// Build the composition table from a tally of the agency's titles.
    pub fn assemble(
        agency: AgencyId,
        name: String,
        target_date: NaiveDate,
        tally: TitleTally,
        index: &OwnershipIndex,
    ) -> Self {
        let total_words = tally.total_words();
        let mut rows: Vec<CompositionRow> = tally
            .log
            .iter()
            .filter_map(|entry| {
                let word_count = entry.status.word_count()?;
                let percentage = if total_words > 0 {
                    word_count as f64 / total_words as f64 * 100.0
                } else {
                    0.0
                };
                Some(CompositionRow {
                    number: entry.number,
                    label: format!("Title {}: {}", entry.number, entry.name),
                    word_count,
                    attributed_words: share_per_owner(
                        word_count,
                        index.owners_of(entry.number).len(),
                    ),
                    percentage,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.percentage
                .total_cmp(&a.percentage)
                .then_with(|| a.number.cmp(&b.number))
        });

        let errors = tally
            .log
            .iter()
            .filter(|entry| entry.status.is_missing_content())
            .map(|entry| (entry.number, entry.status.to_string()))
            .collect();

        Self {
            agency,
            name,
            target_date,
            total_words,
            rows,
            errors,
            log: tally.log,
        }
    }

    /// Whether any title was counted.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Sum of row percentages.
    pub fn percentage_total(&self) -> f64 {
        self.rows.iter().map(|row| row.percentage).sum()
    }

    /// Words attributed to the agency across its counted titles.
    pub fn attributed_total(&self) -> f64 {
        self.rows.iter().map(|row| row.attributed_words).sum()
    }
}
