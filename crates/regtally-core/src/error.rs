//! # Error Hierarchy
//!
//! Validation errors for the domain newtypes, built with `thiserror`.
//! Each variant carries the rejected input so a misconfigured catalog or
//! command line can be diagnosed without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Agency identifiers are catalog slugs and must be non-empty.
    #[error("invalid agency ID: must be non-empty")]
    EmptyAgencyId,

    /// Title numbers start at 1.
    #[error("invalid title number: {0} (expected a positive integer)")]
    InvalidTitleNumber(u32),

    /// A title number could not be parsed from text.
    #[error("invalid title number: \"{0}\" (expected a positive integer)")]
    UnparsableTitleNumber(String),
}
