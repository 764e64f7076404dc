//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifiers the catalog exposes.
//! You cannot pass a [`TitleNumber`] where an [`AgencyId`] is expected, and
//! neither can be constructed in an invalid state.
//!
//! - [`AgencyId`]: the catalog slug (e.g. `agriculture-department`). Stable
//!   and unique within one catalog snapshot, unlike the display name.
//! - [`TitleNumber`]: a positive title number (1..=50 in practice).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stable identifier of an agency (the catalog slug).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgencyId(String);

impl AgencyId {
    /// Create an agency identifier, rejecting empty or whitespace-only slugs.
    pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
        let slug = slug.into();
        let trimmed = slug.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAgencyId);
        }
        if trimmed.len() == slug.len() {
            Ok(Self(slug))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Access the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AgencyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgencyId> for String {
    fn from(id: AgencyId) -> Self {
        id.0
    }
}

/// A regulatory title number. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TitleNumber(u32);

impl TitleNumber {
    /// Create a title number, rejecting zero.
    pub fn new(number: u32) -> Result<Self, ValidationError> {
        if number == 0 {
            return Err(ValidationError::InvalidTitleNumber(number));
        }
        Ok(Self(number))
    }

    /// The raw number.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TitleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TitleNumber {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TitleNumber> for u32 {
    fn from(number: TitleNumber) -> Self {
        number.0
    }
}

impl FromStr for TitleNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::UnparsableTitleNumber(s.to_string()))?;
        Self::new(raw)
    }
}
