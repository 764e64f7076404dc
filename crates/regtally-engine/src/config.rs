//! Analysis configuration.
//!
//! One [`AnalysisConfig`] value is passed into every analysis call. There is
//! no global configuration. Every field has a default, so a partial YAML
//! document such as
//!
//! ```yaml
//! max_titles_to_process: 20
//! target_date: 2024-01-01
//! ```
//!
//! deserializes into a complete configuration.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use regtally_ecfr::retriever::{default_skip_list, DEFAULT_MAX_RETRIES, DEFAULT_THROTTLE_SECS};
use regtally_ecfr::{BackoffPolicy, RetrievalPolicy};

use crate::error::EngineError;

/// Default analysis date.
pub const DEFAULT_TARGET_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(date) => date,
    None => panic!("2025-01-01 is a valid date"),
};

/// Default number of catalog titles processed by a snapshot.
pub const DEFAULT_MAX_TITLES: usize = 5;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = regtally_ecfr::config::DEFAULT_TIMEOUT_SECS;

/// Parameters of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Leading catalog titles considered by snapshots and time series.
    pub max_titles_to_process: usize,
    /// Date the analysis is run "as of".
    pub target_date: NaiveDate,
    /// Honor the problematic-title skip-list.
    pub skip_problematic_titles: bool,
    /// Pause after every network fetch, in seconds.
    pub throttle_delay_secs: f64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Consult and fill session caches.
    pub caching_enabled: bool,
    /// Retries for transient content failures.
    pub max_retries: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_titles_to_process: DEFAULT_MAX_TITLES,
            target_date: DEFAULT_TARGET_DATE,
            skip_problematic_titles: true,
            throttle_delay_secs: DEFAULT_THROTTLE_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            caching_enabled: true,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl AnalysisConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_titles_to_process == 0 {
            return Err(EngineError::InvalidConfig(
                "max_titles_to_process must be at least 1".into(),
            ));
        }
        if !self.throttle_delay_secs.is_finite() || self.throttle_delay_secs <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "throttle_delay_secs must be a positive number, got {}",
                self.throttle_delay_secs
            )));
        }
        if Duration::try_from_secs_f64(self.throttle_delay_secs).is_err() {
            return Err(EngineError::InvalidConfig(format!(
                "throttle_delay_secs {} is out of range",
                self.throttle_delay_secs
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Pause after every network fetch.
    pub fn throttle(&self) -> Duration {
        Duration::try_from_secs_f64(self.throttle_delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The retrieval policy this configuration implies.
    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        RetrievalPolicy {
            request_timeout: self.request_timeout(),
            max_retries: self.max_retries,
            backoff: BackoffPolicy::from_throttle(self.throttle()),
            skip_problematic_titles: self.skip_problematic_titles,
            skip_list: default_skip_list(),
            cache_enabled: self.caching_enabled,
        }
    }
}

/// Cache key covering every parameter that changes a run's result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunKey {
    /// Titles processed.
    pub max_titles: usize,
    /// Target date.
    pub target_date: NaiveDate,
    /// Skip-list honored.
    pub skip_problematic_titles: bool,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Post-fetch throttle.
    pub throttle: Duration,
    /// Retry count.
    pub max_retries: u32,
}

impl From<&AnalysisConfig> for RunKey {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_titles: config.max_titles_to_process,
            target_date: config.target_date,
            skip_problematic_titles: config.skip_problematic_titles,
            request_timeout: config.request_timeout(),
            throttle: config.throttle(),
            max_retries: config.max_retries,
        }
    }
}
