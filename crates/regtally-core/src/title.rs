//! # Titles and Title Content
//!
//! A [`Title`] is one row of the catalog's title list. Titles carry no
//! identity across catalog snapshots: the list is re-read per analysis.
//!
//! [`TitleContent`] is the full text of one title as of one date. It exists
//! only to be reduced to a word count, so the text is held behind an
//! `Arc<str>` and cached copies share one allocation.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identity::TitleNumber;

/// One regulatory volume as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title number.
    pub number: TitleNumber,
    /// Display name.
    pub name: String,
    /// Most recent date for which content is guaranteed retrievable.
    /// The catalog leaves this empty for some reserved titles.
    #[serde(default)]
    pub latest_amended_on: Option<NaiveDate>,
    /// Reserved titles have no substantive content and are never fetched.
    #[serde(default)]
    pub reserved: bool,
}

impl Title {
    /// Create a non-reserved title.
    pub fn new(number: TitleNumber, name: impl Into<String>, latest_amended_on: NaiveDate) -> Self {
        Self {
            number,
            name: name.into(),
            latest_amended_on: Some(latest_amended_on),
            reserved: false,
        }
    }

    /// Mark the title as reserved.
    pub fn reserved(mut self) -> Self {
        self.reserved = true;
        self
    }

    /// The date to request content for when analysing as of `target`.
    ///
    /// Never later than the title's latest amendment: requesting a date past
    /// `latest_amended_on` is not guaranteed to return content.
    pub fn retrieval_date(&self, target: NaiveDate) -> NaiveDate {
        match self.latest_amended_on {
            Some(latest) if latest < target => latest,
            _ => target,
        }
    }

    /// `Title {n}: {name}` label used in composition tables.
    pub fn label(&self) -> String {
        format!("Title {}: {}", self.number, self.name)
    }
}

/// Full text of one title as of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleContent {
    number: TitleNumber,
    date: NaiveDate,
    text: Arc<str>,
}

impl TitleContent {
    /// Wrap retrieved text.
    pub fn new(number: TitleNumber, date: NaiveDate, text: impl Into<Arc<str>>) -> Self {
        Self {
            number,
            date,
            text: text.into(),
        }
    }

    /// Title the text belongs to.
    pub fn number(&self) -> TitleNumber {
        self.number
    }

    /// Date the text was requested for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The raw text (normally XML).
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn title(latest: &str) -> Title {
        Title::new(TitleNumber::new(3).unwrap(), "The President", date(latest))
    }

    #[test]
    fn retrieval_date_uses_latest_amendment_when_earlier() {
        let t = title("2023-06-01");
        assert_eq!(t.retrieval_date(date("2025-01-01")), date("2023-06-01"));
    }

    #[test]
    fn retrieval_date_uses_target_when_amendment_is_later() {
        let t = title("2025-06-01");
        assert_eq!(t.retrieval_date(date("2025-01-01")), date("2025-01-01"));
    }

    #[test]
    fn retrieval_date_equal_dates() {
        let t = title("2025-01-01");
        assert_eq!(t.retrieval_date(date("2025-01-01")), date("2025-01-01"));
    }

    #[test]
    fn retrieval_date_without_amendment_date_uses_target() {
        let mut t = title("2020-01-01");
        t.latest_amended_on = None;
        assert_eq!(t.retrieval_date(date("2024-01-01")), date("2024-01-01"));
    }

    #[test]
    fn label_includes_number_and_name() {
        assert_eq!(title("2024-01-01").label(), "Title 3: The President");
    }

    #[test]
    fn content_clones_share_text() {
        let content = TitleContent::new(TitleNumber::new(1).unwrap(), date("2024-01-01"), "abc");
        let copy = content.clone();
        assert_eq!(copy.text(), "abc");
        assert_eq!(copy.number().get(), 1);
        assert_eq!(copy.date(), date("2024-01-01"));
    }
}
