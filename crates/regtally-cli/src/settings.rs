//! # Run Settings
//!
//! Builds the [`AnalysisConfig`] for a command: defaults, then the YAML file
//! given with `--config`, then command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use regtally_core::hierarchy::{find_agency, find_by_name};
use regtally_core::{Agency, AgencyId};
use regtally_ecfr::{EcfrClient, EcfrConfig};
use regtally_engine::{AnalysisConfig, Analyzer};

/// Flags that override the analysis configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct AnalysisArgs {
    /// Number of leading catalog titles to process.
    #[arg(long)]
    pub max_titles: Option<usize>,

    /// Analysis date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Fetch titles on the problematic-title list too.
    #[arg(long)]
    pub no_skip: bool,

    /// Seconds to pause after every network fetch.
    #[arg(long)]
    pub throttle: Option<f64>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retries for transient failures.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Disable session caching.
    #[arg(long)]
    pub no_cache: bool,
}

impl AnalysisArgs {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(n) = self.max_titles {
            config.max_titles_to_process = n;
        }
        if let Some(date) = self.date {
            config.target_date = date;
        }
        if self.no_skip {
            config.skip_problematic_titles = false;
        }
        if let Some(secs) = self.throttle {
            config.throttle_delay_secs = secs;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
        if let Some(n) = self.retries {
            config.max_retries = n;
        }
        if self.no_cache {
            config.caching_enabled = false;
        }
        config
    }
}

/// Read an [`AnalysisConfig`] from YAML, or the defaults when no file is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// Resolve the final configuration for a command and validate it.
pub fn resolve_config(path: Option<&Path>, args: &AnalysisArgs) -> Result<AnalysisConfig> {
    let config = args.apply(load_config(path)?);
    config.validate()?;
    Ok(config)
}

/// Open an analysis session against the eCFR service configured in the
/// environment.
pub fn connect() -> Result<Analyzer<EcfrClient>> {
    let ecfr = EcfrConfig::from_env()?;
    tracing::debug!(base_url = %ecfr.base_url, "connecting to eCFR");
    let client = EcfrClient::new(ecfr)?;
    Ok(Analyzer::new(client))
}

/// Resolve a slug or an exact display name to an agency id.
pub fn resolve_agency(forest: &[Agency], input: &str) -> Result<AgencyId> {
    if let Ok(id) = AgencyId::new(input) {
        if find_agency(forest, &id).is_some() {
            return Ok(id);
        }
    }
    match find_by_name(forest, input).as_slice() {
        [only] => Ok(only.id.clone()),
        [] => anyhow::bail!("no agency with slug or name '{input}'"),
        many => {
            let slugs: Vec<&str> = many.iter().map(|a| a.id.as_str()).collect();
            anyhow::bail!(
                "agency name '{input}' is ambiguous; use one of: {}",
                slugs.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agency(id: &str, name: &str) -> Agency {
        Agency::new(AgencyId::new(id).unwrap(), name)
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regtally.yaml");
        std::fs::write(&path, "max_titles_to_process: 20\nthrottle_delay_secs: 1.5\n").unwrap();

        let args = AnalysisArgs {
            max_titles: Some(3),
            no_cache: true,
            ..AnalysisArgs::default()
        };
        let config = resolve_config(Some(&path), &args).unwrap();
        assert_eq!(config.max_titles_to_process, 3);
        assert_eq!(config.throttle_delay_secs, 1.5);
        assert!(!config.caching_enabled);
        assert!(config.skip_problematic_titles);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/regtally.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let args = AnalysisArgs {
            throttle: Some(-1.0),
            ..AnalysisArgs::default()
        };
        assert!(resolve_config(None, &args).is_err());
    }

    #[test]
    fn resolve_agency_by_slug_or_name() {
        let forest = vec![
            agency("epa", "Environmental Protection Agency"),
            agency("usda", "Agriculture Department")
                .with_children([agency("fs", "Forest Service")]),
        ];
        assert_eq!(resolve_agency(&forest, "fs").unwrap().as_str(), "fs");
        assert_eq!(
            resolve_agency(&forest, "Environmental Protection Agency")
                .unwrap()
                .as_str(),
            "epa"
        );
        assert!(resolve_agency(&forest, "nope").is_err());
    }

    #[test]
    fn ambiguous_names_are_rejected() {
        let forest = vec![agency("a-1", "Same"), agency("a-2", "Same")];
        let err = resolve_agency(&forest, "Same").unwrap_err();
        assert!(err.to_string().contains("a-1"));
    }
}
