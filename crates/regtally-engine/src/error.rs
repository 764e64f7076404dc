//! Engine error types.
//!
//! Only catalog failures abort a run. Per-title fetch failures are data:
//! they land in the run's title log and never surface as [`EngineError`].

use regtally_core::AgencyId;
use regtally_ecfr::FetchError;
use thiserror::Error;

/// Errors that abort an analysis run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The agency or title catalog could not be retrieved.
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] FetchError),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The year range is empty or unrepresentable.
    #[error("invalid year range {start}..={end}")]
    InvalidYearRange {
        /// First year.
        start: i32,
        /// Last year.
        end: i32,
    },

    /// The requested agency is not in the catalog.
    #[error("unknown agency \"{0}\"")]
    UnknownAgency(AgencyId),
}
