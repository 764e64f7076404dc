//! Per-title processing records shared by every analysis product.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use regtally_core::{count_words, Title, TitleNumber, TitleWordCounts};
use regtally_ecfr::ContentOutcome;

/// What happened to one title during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TitleStatus {
    /// Text retrieved and counted.
    Counted {
        /// Words in the title.
        word_count: u64,
    },
    /// Reserved title, never fetched.
    Reserved,
    /// On the problematic-title list, never fetched.
    SkippedByPolicy,
    /// No text exists for the requested date.
    NotFound,
    /// Transient failures outlasted every retry.
    Unavailable {
        /// Last failure.
        reason: String,
    },
    /// A non-retryable failure.
    Failed {
        /// The failure.
        reason: String,
    },
    /// Owned by the agency but missing from the title catalog.
    NotInCatalog,
}

impl TitleStatus {
    /// Classify a content fetch, counting the words of retrieved text.
    pub fn from_outcome(outcome: &ContentOutcome) -> Self {
        match outcome {
            ContentOutcome::Retrieved { content, .. } => Self::Counted {
                word_count: count_words(Some(content.text())) as u64,
            },
            ContentOutcome::SkippedByPolicy => Self::SkippedByPolicy,
            ContentOutcome::NotFound => Self::NotFound,
            ContentOutcome::Unavailable { error, attempts } => Self::Unavailable {
                reason: format!("{error} (after {attempts} attempts)"),
            },
            ContentOutcome::Failed(error) => Self::Failed {
                reason: error.to_string(),
            },
        }
    }

    /// Word count, for counted titles.
    pub fn word_count(&self) -> Option<u64> {
        match self {
            Self::Counted { word_count } => Some(*word_count),
            _ => None,
        }
    }

    /// Whether the title was expected to yield text but did not.
    pub fn is_missing_content(&self) -> bool {
        !matches!(self, Self::Counted { .. } | Self::Reserved)
    }
}

impl fmt::Display for TitleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counted { word_count } => write!(f, "counted {word_count} words"),
            Self::Reserved => write!(f, "reserved"),
            Self::SkippedByPolicy => write!(f, "skipped by policy"),
            Self::NotFound => write!(f, "not found"),
            Self::Unavailable { reason } => write!(f, "unavailable: {reason}"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::NotInCatalog => write!(f, "not in title catalog"),
        }
    }
}

/// One line of a run's per-title log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleLogEntry {
    /// Title.
    pub number: TitleNumber,
    /// Title name.
    pub name: String,
    /// Date requested; absent when no request was planned.
    pub date: Option<NaiveDate>,
    /// Outcome.
    #[serde(flatten)]
    pub status: TitleStatus,
}

/// One counted title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRow {
    /// Title.
    pub number: TitleNumber,
    /// Title name.
    pub name: String,
    /// Date the text was retrieved for.
    pub date: NaiveDate,
    /// Words in the title.
    pub word_count: u64,
}

/// Word counts and log of one pass over a list of titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleTally {
    /// Counted titles only. Titles without text are absent, not zero.
    pub counts: TitleWordCounts,
    /// Every title considered, in processing order.
    pub log: Vec<TitleLogEntry>,
}

impl TitleTally {
    /// Record a reserved title.
    pub fn reserved(&mut self, title: &Title) {
        self.push(title.number, &title.name, None, TitleStatus::Reserved);
    }

    /// Record a processed title.
    pub fn push(
        &mut self,
        number: TitleNumber,
        name: &str,
        date: Option<NaiveDate>,
        status: TitleStatus,
    ) {
        if let Some(words) = status.word_count() {
            self.counts.insert(number, words);
        }
        self.log.push(TitleLogEntry {
            number,
            name: name.to_string(),
            date,
            status,
        });
    }

    /// Counted titles, most words first, ties by title number.
    pub fn counted_rows(&self) -> Vec<TitleRow> {
        let mut rows: Vec<TitleRow> = self
            .log
            .iter()
            .filter_map(|entry| {
                let word_count = entry.status.word_count()?;
                Some(TitleRow {
                    number: entry.number,
                    name: entry.name.clone(),
                    date: entry.date?,
                    word_count,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.word_count
                .cmp(&a.word_count)
                .then_with(|| a.number.cmp(&b.number))
        });
        rows
    }

    /// Sum of counted words.
    pub fn total_words(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtally_core::TitleContent;
    use regtally_ecfr::FetchError;

    fn t(n: u32) -> TitleNumber {
        TitleNumber::new(n).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn retrieved_text_is_counted() {
        let outcome = ContentOutcome::Retrieved {
            content: TitleContent::new(t(1), day(), "<P>three short words</P>"),
            from_cache: false,
        };
        assert_eq!(
            TitleStatus::from_outcome(&outcome),
            TitleStatus::Counted { word_count: 3 }
        );
    }

    #[test]
    fn failures_keep_their_reason() {
        let outcome = ContentOutcome::Unavailable {
            error: FetchError::Gateway {
                endpoint: "GET /full".into(),
                status: 504,
            },
            attempts: 2,
        };
        match TitleStatus::from_outcome(&outcome) {
            TitleStatus::Unavailable { reason } => {
                assert!(reason.contains("504"));
                assert!(reason.contains("2 attempts"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn only_counted_titles_enter_the_counts() {
        let mut tally = TitleTally::default();
        tally.push(t(1), "One", Some(day()), TitleStatus::Counted { word_count: 10 });
        tally.push(t(2), "Two", Some(day()), TitleStatus::NotFound);
        tally.reserved(&Title::new(t(35), "Reserved", day()).reserved());
        tally.push(t(3), "Three", Some(day()), TitleStatus::Counted { word_count: 0 });

        assert_eq!(tally.counts.len(), 2);
        assert_eq!(tally.counts.get(&t(3)), Some(&0));
        assert!(!tally.counts.contains_key(&t(2)));
        assert_eq!(tally.log.len(), 4);
        assert_eq!(tally.total_words(), 10);
    }

    #[test]
    fn counted_rows_sort_by_words_then_number() {
        let mut tally = TitleTally::default();
        tally.push(t(4), "Four", Some(day()), TitleStatus::Counted { word_count: 5 });
        tally.push(t(2), "Two", Some(day()), TitleStatus::Counted { word_count: 9 });
        tally.push(t(3), "Three", Some(day()), TitleStatus::Counted { word_count: 5 });
        let order: Vec<u32> = tally.counted_rows().iter().map(|r| r.number.get()).collect();
        assert_eq!(order, vec![2, 3, 4]);
    }

    #[test]
    fn missing_content_excludes_reserved() {
        assert!(!TitleStatus::Reserved.is_missing_content());
        assert!(!TitleStatus::Counted { word_count: 1 }.is_missing_content());
        assert!(TitleStatus::SkippedByPolicy.is_missing_content());
        assert!(TitleStatus::NotInCatalog.is_missing_content());
    }

    #[test]
    fn log_entry_serializes_flat() {
        let entry = TitleLogEntry {
            number: t(3),
            name: "The President".into(),
            date: Some(day()),
            status: TitleStatus::Counted { word_count: 12 },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "counted");
        assert_eq!(json["word_count"], 12);
        assert_eq!(json["number"], 3);
        assert_eq!(json["date"], "2024-01-01");
    }
}
