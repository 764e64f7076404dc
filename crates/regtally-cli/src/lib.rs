//! # regtally-cli — Command-Line Front End
//!
//! Provides the `regtally` binary. Every subcommand opens one analysis
//! session against the eCFR service, runs a single analysis and prints the
//! result as text or JSON.
//!
//! ## Subcommands
//!
//! - `regtally hierarchy` — Agency forest views (table, graph, names, summary).
//! - `regtally snapshot` — Word counts per agency and per title for one date.
//! - `regtally trend` — Per-agency word counts across a range of years.
//! - `regtally composition` — One agency's footprint broken down by title.
//!
//! ## Configuration
//!
//! Analysis parameters come from defaults, then the YAML file passed with
//! `--config`, then per-command flags. The eCFR endpoint and timeout are
//! read from `ECFR_BASE_URL` and `ECFR_TIMEOUT_SECS`.
//!
//! ```bash
//! regtally -v snapshot --max-titles 10
//! regtally --config regtally.yaml trend --start 2020 --end 2024
//! regtally --format json composition epa
//! ```

pub mod composition;
pub mod hierarchy;
pub mod output;
pub mod settings;
pub mod snapshot;
pub mod trend;
