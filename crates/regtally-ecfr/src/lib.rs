#![deny(missing_docs)]

//! # regtally-ecfr — eCFR Catalog Client
//!
//! Typed access to the three eCFR resources the engine consumes:
//!
//! | Resource | Endpoint |
//! |----------|----------|
//! | Agency forest | `GET /api/admin/v1/agencies.json` |
//! | Title metadata | `GET /api/versioner/v1/titles.json` |
//! | Title text | `GET /api/versioner/v1/full/{date}/title-{n}.xml` |
//!
//! ## Layers
//!
//! - [`EcfrClient`]: one HTTP request per call, classified into
//!   [`FetchError`]. No retry.
//! - [`CatalogSource`]: the seam the client implements, so the engine can
//!   run against an in-memory catalog.
//! - [`Retriever`]: skip-list, retry with [`BackoffPolicy`], and session
//!   memoization over any source, governed by a [`RetrievalPolicy`].
//!
//! Requests are issued one at a time. Nothing here spawns tasks.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod retriever;
pub mod retry;
pub mod source;

pub use client::EcfrClient;
pub use config::{ConfigError, EcfrConfig};
pub use error::FetchError;
pub use retriever::{ContentKey, ContentOutcome, RetrievalPolicy, Retriever};
pub use retry::BackoffPolicy;
pub use source::CatalogSource;
