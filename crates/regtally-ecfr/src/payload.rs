//! Wire types for the eCFR admin and versioner APIs, and their conversion
//! into the domain model.
//!
//! ## Live payload shapes
//!
//! | Endpoint | Envelope | Record |
//! |----------|----------|--------|
//! | `GET /api/admin/v1/agencies.json` | `{"agencies": [...]}` | `slug`, `name`, `short_name`, `cfr_references[{title, chapter}]`, `children[...]` |
//! | `GET /api/versioner/v1/titles.json` | `{"titles": [...]}` | `number`, `name`, `latest_amended_on`, `reserved` |
//!
//! Records use `#[serde(default)]` for resilience against schema evolution.
//! Unknown fields are ignored. Conversion is defensive: records the domain
//! cannot represent (empty slug, title 0) are dropped with a warning rather
//! than failing the whole catalog.

use chrono::NaiveDate;
use serde::Deserialize;

use regtally_core::{Agency, AgencyId, Title, TitleNumber};

/// Deepest agency nesting accepted from the catalog. The live catalog is
/// two levels deep.
pub const MAX_AGENCY_DEPTH: usize = 32;

/// Envelope of `agencies.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AgenciesResponse {
    /// Top-level agencies.
    #[serde(default)]
    pub agencies: Vec<AgencyRecord>,
}

/// One agency as returned by the admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct AgencyRecord {
    /// Stable identifier.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Abbreviation; the API returns `null` or `""` when absent.
    #[serde(default)]
    pub short_name: Option<String>,
    /// Regulated title/chapter pairs.
    #[serde(default)]
    pub cfr_references: Option<Vec<CfrReference>>,
    /// Sub-agencies.
    #[serde(default)]
    pub children: Option<Vec<AgencyRecord>>,
}

/// One `cfr_references` entry. Some entries carry only a chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct CfrReference {
    /// Title number, when present.
    #[serde(default)]
    pub title: Option<u32>,
    /// Chapter designation, unused by attribution.
    #[serde(default)]
    pub chapter: Option<String>,
}

/// Envelope of `titles.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TitlesResponse {
    /// Titles in catalog order.
    #[serde(default)]
    pub titles: Vec<TitleRecord>,
}

/// One title as returned by the versioner API.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleRecord {
    /// Title number.
    pub number: u32,
    /// Display name.
    #[serde(default = "unknown_title_name")]
    pub name: String,
    /// `YYYY-MM-DD`; `null` for some reserved titles.
    #[serde(default)]
    pub latest_amended_on: Option<NaiveDate>,
    /// Reserved titles carry no content.
    #[serde(default)]
    pub reserved: bool,
}

fn unknown_title_name() -> String {
    "Unknown".to_string()
}

/// Conversion failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The agency tree nests deeper than [`MAX_AGENCY_DEPTH`].
    #[error("agency tree nests deeper than {MAX_AGENCY_DEPTH} levels at \"{slug}\"")]
    TooDeep {
        /// Slug of the first agency past the limit.
        slug: String,
    },
}

impl AgencyRecord {
    fn into_agency(self, depth: usize) -> Result<Option<Agency>, PayloadError> {
        if depth > MAX_AGENCY_DEPTH {
            return Err(PayloadError::TooDeep { slug: self.slug });
        }
        let id = match AgencyId::new(self.slug) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(name = %self.name, "dropping agency record: {e}");
                return Ok(None);
            }
        };

        let titles = self
            .cfr_references
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.title)
            .filter_map(|n| TitleNumber::new(n).ok());

        let mut children = Vec::new();
        for child in self.children.unwrap_or_default() {
            if let Some(agency) = child.into_agency(depth + 1)? {
                children.push(agency);
            }
        }

        let mut agency = Agency::new(id, self.name)
            .with_titles(titles)
            .with_children(children);
        agency.short_name = self.short_name.filter(|s| !s.trim().is_empty());
        Ok(Some(agency))
    }
}

impl AgenciesResponse {
    /// Convert to the domain forest.
    pub fn into_agencies(self) -> Result<Vec<Agency>, PayloadError> {
        let mut forest = Vec::with_capacity(self.agencies.len());
        for record in self.agencies {
            if let Some(agency) = record.into_agency(0)? {
                forest.push(agency);
            }
        }
        Ok(forest)
    }
}

impl TitlesResponse {
    /// Convert to domain titles, keeping catalog order.
    pub fn into_titles(self) -> Vec<Title> {
        self.titles
            .into_iter()
            .filter_map(|record| match TitleNumber::new(record.number) {
                Ok(number) => Some(Title {
                    number,
                    name: record.name,
                    latest_amended_on: record.latest_amended_on,
                    reserved: record.reserved,
                }),
                Err(e) => {
                    tracing::warn!(name = %record.name, "dropping title record: {e}");
                    None
                }
            })
            .collect()
    }
}
