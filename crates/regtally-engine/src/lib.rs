#![deny(missing_docs)]

//! # regtally-engine — Regulatory Attribution Engine
//!
//! Turns the eCFR catalog into attributed word counts:
//!
//! - **Snapshot** ([`Analyzer::snapshot`]): the first N catalog titles as of
//!   one date, attributed to their owning agencies.
//! - **Time series** ([`Analyzer::time_series`]): one snapshot per year as of
//!   January 1st.
//! - **Composition** ([`Analyzer::composition`]): every title one agency
//!   references, as a percentage breakdown.
//!
//! ## Failure model
//!
//! Only the agency and title catalogs are load-bearing: if either cannot be
//! fetched the run fails with [`EngineError::Catalog`]. Individual titles
//! that cannot be fetched are recorded in the run's per-title log and left
//! out of the counts, so every run returns whatever data was obtainable.
//!
//! ## Caching
//!
//! Results are memoized per [`Analyzer`] under keys holding the full
//! parameter set of the request. With [`AnalysisConfig::caching_enabled`]
//! off, every call recomputes and yields the same result.

pub mod analyzer;
pub mod composition;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod tally;
pub mod trend;

pub use analyzer::Analyzer;
pub use composition::{Composition, CompositionRow};
pub use config::AnalysisConfig;
pub use error::EngineError;
pub use snapshot::{AgencyRow, Snapshot};
pub use tally::{TitleLogEntry, TitleRow, TitleStatus};
pub use trend::{PivotRow, TimeSeries, TrendRow};
