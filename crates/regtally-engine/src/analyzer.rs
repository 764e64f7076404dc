//! The analysis session.
//!
//! An [`Analyzer`] owns a [`Retriever`] and the result caches of one
//! session. Every call takes the [`AnalysisConfig`] to run with, validates
//! it, and either returns a cached result for the exact same parameters or
//! computes a fresh one.
//!
//! Titles are processed strictly one after another. After every fetch that
//! reached the network the analyzer sleeps for the configured throttle
//! delay; cache hits and skip-listed titles cost nothing.

use std::sync::Arc;

use chrono::NaiveDate;

use regtally_core::hierarchy::find_agency;
use regtally_core::{attribute, Agency, AgencyId, OwnershipIndex, SessionCache, Title};
use regtally_ecfr::{CatalogSource, RetrievalPolicy, Retriever};

use crate::composition::Composition;
use crate::config::{AnalysisConfig, RunKey};
use crate::error::EngineError;
use crate::snapshot::Snapshot;
use crate::tally::{TitleStatus, TitleTally};
use crate::trend::{validate_years, year_start, TimeSeries};

/// Cache key of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    /// Run parameters.
    pub run: RunKey,
    /// First year.
    pub start_year: i32,
    /// Last year, inclusive.
    pub end_year: i32,
}

/// Cache key of a composition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositionKey {
    /// Run parameters.
    pub run: RunKey,
    /// Agency analysed.
    pub agency: AgencyId,
}

/// One analysis session over a catalog source.
#[derive(Debug)]
pub struct Analyzer<S> {
    retriever: Retriever<S>,
    snapshots: SessionCache<RunKey, Arc<Snapshot>>,
    series: SessionCache<SeriesKey, Arc<TimeSeries>>,
    compositions: SessionCache<CompositionKey, Arc<Composition>>,
}

impl<S: CatalogSource> Analyzer<S> {
    /// Start a session with empty caches.
    pub fn new(source: S) -> Self {
        Self {
            retriever: Retriever::new(source),
            snapshots: SessionCache::new(),
            series: SessionCache::new(),
            compositions: SessionCache::new(),
        }
    }

    /// The underlying retriever.
    pub fn retriever(&self) -> &Retriever<S> {
        &self.retriever
    }

    /// Drop every cached payload and result.
    pub fn clear_caches(&mut self) {
        self.retriever.clear();
        self.snapshots.clear();
        self.series.clear();
        self.compositions.clear();
    }

    fn prepare(&mut self, config: &AnalysisConfig) -> Result<RetrievalPolicy, EngineError> {
        config.validate()?;
        self.snapshots.set_enabled(config.caching_enabled);
        self.series.set_enabled(config.caching_enabled);
        self.compositions.set_enabled(config.caching_enabled);
        Ok(config.retrieval_policy())
    }

    /// The agency forest.
    pub async fn agencies(&mut self, config: &AnalysisConfig) -> Result<Arc<Vec<Agency>>, EngineError> {
        let policy = self.prepare(config)?;
        Ok(self.retriever.agencies(&policy, false).await?)
    }

    /// Title metadata in catalog order.
    pub async fn titles(&mut self, config: &AnalysisConfig) -> Result<Arc<Vec<Title>>, EngineError> {
        let policy = self.prepare(config)?;
        Ok(self.retriever.titles(&policy, false).await?)
    }

    /// Fetch and count `titles` as of `target`, in order.
    async fn tally(
        &mut self,
        titles: &[Title],
        target: NaiveDate,
        config: &AnalysisConfig,
        policy: &RetrievalPolicy,
    ) -> TitleTally {
        let mut tally = TitleTally::default();
        let throttle = config.throttle();

        for (i, title) in titles.iter().enumerate() {
            if title.reserved {
                tracing::info!(title = %title.number, "skipping reserved title");
                tally.reserved(title);
                continue;
            }

            let date = title.retrieval_date(target);
            tracing::info!(
                title = %title.number,
                date = %date,
                "processing title {} of {}: {}",
                i + 1,
                titles.len(),
                title.name
            );

            let outcome = self
                .retriever
                .title_content(title.number, date, policy, false)
                .await;
            let status = TitleStatus::from_outcome(&outcome);
            if let Some(words) = status.word_count() {
                tracing::info!(title = %title.number, date = %date, words, "counted title");
            }
            tally.push(title.number, &title.name, Some(date), status);

            if outcome.reached_network() && !throttle.is_zero() {
                tokio::time::sleep(throttle).await;
            }
        }

        tally
    }

    /// Word counts per agency for the first
    /// [`AnalysisConfig::max_titles_to_process`] catalog titles.
    pub async fn snapshot(&mut self, config: &AnalysisConfig) -> Result<Arc<Snapshot>, EngineError> {
        let policy = self.prepare(config)?;
        let key = RunKey::from(config);
        if let Some(cached) = self.snapshots.get(&key) {
            tracing::debug!("snapshot served from cache");
            return Ok(Arc::clone(cached));
        }

        let agencies = self.retriever.agencies(&policy, false).await?;
        let titles = self.retriever.titles(&policy, false).await?;
        let index = OwnershipIndex::build(&agencies);

        let take = config.max_titles_to_process.min(titles.len());
        tracing::info!(
            titles = take,
            target_date = %config.target_date,
            "running snapshot"
        );
        let tally = self
            .tally(&titles[..take], config.target_date, config, &policy)
            .await;

        let snapshot = Arc::new(Snapshot::assemble(config.target_date, tally, &index));
        self.snapshots.put(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Snapshot totals for every year in `start_year..=end_year`, each as of
    /// January 1st.
    pub async fn time_series(
        &mut self,
        config: &AnalysisConfig,
        start_year: i32,
        end_year: i32,
    ) -> Result<Arc<TimeSeries>, EngineError> {
        let policy = self.prepare(config)?;
        validate_years(start_year, end_year)?;
        let key = SeriesKey {
            run: RunKey::from(config),
            start_year,
            end_year,
        };
        if let Some(cached) = self.series.get(&key) {
            tracing::debug!("time series served from cache");
            return Ok(Arc::clone(cached));
        }

        let agencies = self.retriever.agencies(&policy, false).await?;
        let titles = self.retriever.titles(&policy, false).await?;
        let index = OwnershipIndex::build(&agencies);
        let take = config.max_titles_to_process.min(titles.len());

        let mut series = TimeSeries::default();
        for year in start_year..=end_year {
            let target = year_start(year)?;
            tracing::info!(year, titles = take, "processing year");
            let tally = self.tally(&titles[..take], target, config, &policy).await;

            let totals = attribute(&tally.counts, &index).into_totals();
            let names: Vec<(AgencyId, String)> = totals
                .keys()
                .map(|id| {
                    let name = index.name_of(id).unwrap_or(id.as_str()).to_string();
                    (id.clone(), name)
                })
                .collect();
            series.insert_year(year, totals, names, tally.log);
        }

        let series = Arc::new(series);
        self.series.put(key, Arc::clone(&series));
        Ok(series)
    }

    /// Breakdown of `agency`'s footprint across every title it references.
    pub async fn composition(
        &mut self,
        config: &AnalysisConfig,
        agency: &AgencyId,
    ) -> Result<Arc<Composition>, EngineError> {
        let policy = self.prepare(config)?;
        let key = CompositionKey {
            run: RunKey::from(config),
            agency: agency.clone(),
        };
        if let Some(cached) = self.compositions.get(&key) {
            tracing::debug!(agency = %agency, "composition served from cache");
            return Ok(Arc::clone(cached));
        }

        let agencies = self.retriever.agencies(&policy, false).await?;
        let name = find_agency(&agencies, agency)
            .map(|a| a.name.clone())
            .ok_or_else(|| EngineError::UnknownAgency(agency.clone()))?;
        let titles = self.retriever.titles(&policy, false).await?;
        let index = OwnershipIndex::build(&agencies);

        let owned = index.titles_for(agency).cloned().unwrap_or_default();
        if owned.is_empty() {
            tracing::warn!(agency = %agency, "agency references no titles");
        }

        let relevant: Vec<Title> = titles
            .iter()
            .filter(|title| owned.contains(&title.number))
            .cloned()
            .collect();
        tracing::info!(
            agency = %agency,
            titles = relevant.len(),
            target_date = %config.target_date,
            "running composition"
        );
        let mut tally = self
            .tally(&relevant, config.target_date, config, &policy)
            .await;

        for &number in &owned {
            if !relevant.iter().any(|title| title.number == number) {
                tracing::warn!(agency = %agency, title = %number, "owned title missing from title catalog");
                tally.push(number, "Unknown", None, TitleStatus::NotInCatalog);
            }
        }

        let composition = Arc::new(Composition::assemble(
            agency.clone(),
            name,
            config.target_date,
            tally,
            &index,
        ));
        self.compositions.put(key, Arc::clone(&composition));
        Ok(composition)
    }
}
