//! In-memory catalog for engine integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use regtally_core::{Agency, AgencyId, Title, TitleNumber};
use regtally_ecfr::{CatalogSource, FetchError};

/// Catalog served from memory, recording every content request.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub agencies: Vec<Agency>,
    pub titles: Vec<Title>,
    /// Text per title, any date.
    pub texts: HashMap<TitleNumber, String>,
    /// Text per `(title, date)`, preferred over [`FakeCatalog::texts`].
    pub dated_texts: HashMap<(TitleNumber, NaiveDate), String>,
    /// Titles that fail with the given error.
    pub failures: HashMap<TitleNumber, FetchError>,
    /// Fail the agency catalog.
    pub catalog_down: bool,
    pub requests: RefCell<Vec<(TitleNumber, NaiveDate)>>,
    pub catalog_calls: RefCell<u32>,
}

impl FakeCatalog {
    pub fn with_text(mut self, number: u32, text: impl Into<String>) -> Self {
        self.texts.insert(t(number), text.into());
        self
    }

    pub fn with_dated_text(mut self, number: u32, date: NaiveDate, text: impl Into<String>) -> Self {
        self.dated_texts.insert((t(number), date), text.into());
        self
    }

    pub fn with_failure(mut self, number: u32, error: FetchError) -> Self {
        self.failures.insert(t(number), error);
        self
    }

    pub fn requested_titles(&self) -> Vec<u32> {
        self.requests.borrow().iter().map(|(n, _)| n.get()).collect()
    }

    pub fn requests(&self) -> Vec<(u32, NaiveDate)> {
        self.requests
            .borrow()
            .iter()
            .map(|(n, d)| (n.get(), *d))
            .collect()
    }
}

impl CatalogSource for FakeCatalog {
    async fn agencies(&self, _timeout: Duration) -> Result<Vec<Agency>, FetchError> {
        *self.catalog_calls.borrow_mut() += 1;
        if self.catalog_down {
            return Err(FetchError::Gateway {
                endpoint: "GET /api/admin/v1/agencies.json".into(),
                status: 503,
            });
        }
        Ok(self.agencies.clone())
    }

    async fn titles(&self, _timeout: Duration) -> Result<Vec<Title>, FetchError> {
        Ok(self.titles.clone())
    }

    async fn title_content(
        &self,
        number: TitleNumber,
        date: NaiveDate,
        _timeout: Duration,
    ) -> Result<String, FetchError> {
        self.requests.borrow_mut().push((number, date));
        let endpoint = format!("GET /api/versioner/v1/full/{date}/title-{number}.xml");
        if let Some(error) = self.failures.get(&number) {
            return Err(error.clone());
        }
        self.dated_texts
            .get(&(number, date))
            .or_else(|| self.texts.get(&number))
            .cloned()
            .ok_or(FetchError::NotFound { endpoint })
    }
}

pub fn id(s: &str) -> AgencyId {
    AgencyId::new(s).unwrap()
}

pub fn t(n: u32) -> TitleNumber {
    TitleNumber::new(n).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn title(n: u32, name: &str, latest: NaiveDate) -> Title {
    Title::new(t(n), name, latest)
}

/// XML with exactly `n` words of text.
pub fn words(n: usize) -> String {
    format!("<DIV1><P>{}</P></DIV1>", vec!["word"; n].join(" "))
}
