#![deny(missing_docs)]

//! # regtally-core — Foundational Types for regtally
//!
//! This crate defines the types and pure algorithms every other crate in the
//! workspace builds on. It performs no I/O: retrieval lives in
//! `regtally-ecfr`, orchestration in `regtally-engine`.
//!
//! ## Design Principles
//!
//! 1. **Newtype identifiers.** An [`AgencyId`] is the catalog slug and a
//!    [`TitleNumber`] is a positive integer. Attribution is keyed by
//!    [`AgencyId`], never by display name, so two agencies that share a name
//!    keep separate totals.
//!
//! 2. **The agency forest is immutable.** [`Agency`] values are built once per
//!    retrieval. Every derived structure ([`OwnershipIndex`], hierarchy rows,
//!    graphs) is a separate value.
//!
//! 3. **No recursion over catalog data.** Tree walks use explicit work stacks
//!    (see [`hierarchy::DepthFirst`]), so a deeply nested catalog cannot
//!    exhaust the call stack.
//!
//! 4. **Deterministic arithmetic.** [`attribute`] iterates in a fixed order and
//!    never rounds, so repeated runs over the same inputs produce
//!    bit-identical totals.

pub mod agency;
pub mod attribution;
pub mod cache;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod ownership;
pub mod title;
pub mod wordcount;

// Re-export primary types at crate root for ergonomic imports.
pub use agency::Agency;
pub use attribution::{attribute, Attribution, TitleWordCounts};
pub use cache::SessionCache;
pub use error::ValidationError;
pub use hierarchy::{HierarchyFilter, HierarchyGraph, HierarchyRow, HierarchySummary};
pub use identity::{AgencyId, TitleNumber};
pub use ownership::OwnershipIndex;
pub use title::{Title, TitleContent};
pub use wordcount::count_words;
