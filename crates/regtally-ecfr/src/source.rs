//! The catalog seam.
//!
//! [`CatalogSource`] is the boundary between retrieval policy (skip-list,
//! retries, memoization) and transport. [`crate::EcfrClient`] implements it
//! over HTTP; tests implement it in memory.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use regtally_core::{Agency, Title, TitleNumber};

use crate::error::FetchError;

/// A source of agency, title and title-text data.
///
/// Each call is a single attempt. Retry and caching are layered on top by
/// [`crate::Retriever`].
pub trait CatalogSource {
    /// The agency forest.
    fn agencies(&self, timeout: Duration) -> impl Future<Output = Result<Vec<Agency>, FetchError>>;

    /// Title metadata in catalog order.
    fn titles(&self, timeout: Duration) -> impl Future<Output = Result<Vec<Title>, FetchError>>;

    /// Raw XML text of one title as of `date`.
    fn title_content(
        &self,
        number: TitleNumber,
        date: NaiveDate,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>>;
}
