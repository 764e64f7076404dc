//! # Agency Model
//!
//! An [`Agency`] is a node in the catalog forest: it may directly regulate
//! zero or more titles and may own an ordered list of child agencies of the
//! same shape. Children are owned exclusively by their parent.
//!
//! The catalog's contract is a tree. If the same agency appears under two
//! parents, each occurrence is kept as an independent node; the
//! [`OwnershipIndex`](crate::OwnershipIndex) merges them by [`AgencyId`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::{AgencyId, TitleNumber};

/// A node in the agency forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    /// Stable catalog slug.
    pub id: AgencyId,
    /// Display name. Not guaranteed unique across the catalog.
    pub name: String,
    /// Optional abbreviation (e.g. `USDA`).
    #[serde(default)]
    pub short_name: Option<String>,
    /// Titles this agency regulates directly.
    #[serde(default)]
    pub title_references: BTreeSet<TitleNumber>,
    /// Child agencies in catalog order.
    #[serde(default)]
    pub children: Vec<Agency>,
}

impl Agency {
    /// Create a leaf agency with no title references.
    pub fn new(id: AgencyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: None,
            title_references: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Set the abbreviation.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Add direct title references.
    pub fn with_titles(mut self, titles: impl IntoIterator<Item = TitleNumber>) -> Self {
        self.title_references.extend(titles);
        self
    }

    /// Append child agencies.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Agency>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether this agency has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Short name, or the empty string when the catalog omits it.
    pub fn short_name_or_empty(&self) -> &str {
        self.short_name.as_deref().unwrap_or("")
    }
}
