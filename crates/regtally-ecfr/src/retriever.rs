//! Retrieval policy and the memoizing retriever.
//!
//! [`Retriever`] layers skip-list, retry and session caching over any
//! [`CatalogSource`]. The catalog calls (agencies, titles) are a single
//! attempt whose failure is the caller's to handle. Title content never
//! fails the caller: every fetch resolves to a [`ContentOutcome`].
//!
//! Content policy, in order:
//!
//! 1. skip-listed title (when skipping is enabled): no request;
//! 2. cache hit (unless `force_refresh`): no request;
//! 3. request, retrying timeouts and 5xx per [`RetrievalPolicy::max_retries`];
//! 4. 404 degrades to [`ContentOutcome::NotFound`] without retry;
//! 5. anything else degrades to [`ContentOutcome::Failed`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use regtally_core::{Agency, SessionCache, Title, TitleContent, TitleNumber};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::FetchError;
use crate::retry::{retry_transient, BackoffPolicy};
use crate::source::CatalogSource;

/// Titles whose full text is too large to render before the upstream
/// gateway times out.
pub const DEFAULT_SKIP_LIST: [u32; 5] = [7, 10, 40, 42, 45];

/// Default retry count for content fetches.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default pause after each network fetch, in seconds.
pub const DEFAULT_THROTTLE_SECS: f64 = 0.2;

/// How content is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalPolicy {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Pause schedule between attempts.
    pub backoff: BackoffPolicy,
    /// Whether [`RetrievalPolicy::skip_list`] is honored.
    pub skip_problematic_titles: bool,
    /// Titles never requested while skipping is enabled.
    pub skip_list: BTreeSet<TitleNumber>,
    /// Whether session caches are consulted and filled.
    pub cache_enabled: bool,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffPolicy::from_throttle(Duration::from_secs_f64(DEFAULT_THROTTLE_SECS)),
            skip_problematic_titles: true,
            skip_list: default_skip_list(),
            cache_enabled: true,
        }
    }
}

/// [`DEFAULT_SKIP_LIST`] as title numbers.
pub fn default_skip_list() -> BTreeSet<TitleNumber> {
    DEFAULT_SKIP_LIST
        .iter()
        .filter_map(|&n| TitleNumber::new(n).ok())
        .collect()
}

impl RetrievalPolicy {
    /// Whether `number` is skipped without a request.
    pub fn skips(&self, number: TitleNumber) -> bool {
        self.skip_problematic_titles && self.skip_list.contains(&number)
    }
}

/// Cache key for title text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey {
    /// Title.
    pub number: TitleNumber,
    /// Requested date.
    pub date: NaiveDate,
}

/// What happened to one content fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOutcome {
    /// Text is available.
    Retrieved {
        /// The text.
        content: TitleContent,
        /// Served from the session cache without a request.
        from_cache: bool,
    },
    /// On the skip-list; no request was made.
    SkippedByPolicy,
    /// The title does not exist for that date.
    NotFound,
    /// Transient failures persisted through every retry.
    Unavailable {
        /// Last failure.
        error: FetchError,
        /// Requests made.
        attempts: u32,
    },
    /// A non-retryable failure.
    Failed(FetchError),
}

impl ContentOutcome {
    /// The text, if any.
    pub fn content(&self) -> Option<&TitleContent> {
        match self {
            Self::Retrieved { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Consume into the text, if any.
    pub fn into_content(self) -> Option<TitleContent> {
        match self {
            Self::Retrieved { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Whether producing this outcome issued at least one request.
    pub fn reached_network(&self) -> bool {
        !matches!(
            self,
            Self::SkippedByPolicy
                | Self::Retrieved {
                    from_cache: true,
                    ..
                }
        )
    }

    /// The failure behind a missing text, for outcomes that are errors.
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Unavailable { error, .. } | Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for ContentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieved {
                from_cache: true, ..
            } => write!(f, "retrieved (cached)"),
            Self::Retrieved { .. } => write!(f, "retrieved"),
            Self::SkippedByPolicy => write!(f, "skipped by policy"),
            Self::NotFound => write!(f, "not found"),
            Self::Unavailable { error, attempts } => {
                write!(f, "unavailable after {attempts} attempts: {error}")
            }
            Self::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

/// Memoizing front for a [`CatalogSource`].
#[derive(Debug)]
pub struct Retriever<S> {
    source: S,
    agencies: SessionCache<(), Arc<Vec<Agency>>>,
    titles: SessionCache<(), Arc<Vec<Title>>>,
    content: SessionCache<ContentKey, TitleContent>,
}

impl<S: CatalogSource> Retriever<S> {
    /// Wrap `source` with empty caches.
    pub fn new(source: S) -> Self {
        Self {
            source,
            agencies: SessionCache::new(),
            titles: SessionCache::new(),
            content: SessionCache::new(),
        }
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop every cached payload.
    pub fn clear(&mut self) {
        self.agencies.clear();
        self.titles.clear();
        self.content.clear();
    }

    fn apply_caching(&mut self, enabled: bool) {
        self.agencies.set_enabled(enabled);
        self.titles.set_enabled(enabled);
        self.content.set_enabled(enabled);
    }

    /// The agency forest.
    pub async fn agencies(
        &mut self,
        policy: &RetrievalPolicy,
        force_refresh: bool,
    ) -> Result<Arc<Vec<Agency>>, FetchError> {
        self.apply_caching(policy.cache_enabled);
        if !force_refresh {
            if let Some(cached) = self.agencies.get(&()) {
                tracing::debug!("agency catalog served from cache");
                return Ok(Arc::clone(cached));
            }
        }
        let forest = Arc::new(self.source.agencies(policy.request_timeout).await?);
        tracing::info!(count = forest.len(), "fetched agency catalog");
        self.agencies.put((), Arc::clone(&forest));
        Ok(forest)
    }

    /// Title metadata in catalog order.
    pub async fn titles(
        &mut self,
        policy: &RetrievalPolicy,
        force_refresh: bool,
    ) -> Result<Arc<Vec<Title>>, FetchError> {
        self.apply_caching(policy.cache_enabled);
        if !force_refresh {
            if let Some(cached) = self.titles.get(&()) {
                tracing::debug!("title catalog served from cache");
                return Ok(Arc::clone(cached));
            }
        }
        let titles = Arc::new(self.source.titles(policy.request_timeout).await?);
        tracing::info!(count = titles.len(), "fetched title catalog");
        self.titles.put((), Arc::clone(&titles));
        Ok(titles)
    }

    /// Text of `number` as of `date`.
    pub async fn title_content(
        &mut self,
        number: TitleNumber,
        date: NaiveDate,
        policy: &RetrievalPolicy,
        force_refresh: bool,
    ) -> ContentOutcome {
        if policy.skips(number) {
            tracing::warn!(title = %number, "skipping title on the problematic-title list");
            return ContentOutcome::SkippedByPolicy;
        }

        self.apply_caching(policy.cache_enabled);
        let key = ContentKey { number, date };
        if !force_refresh {
            if let Some(cached) = self.content.get(&key) {
                tracing::debug!(title = %number, date = %date, "title content served from cache");
                return ContentOutcome::Retrieved {
                    content: cached.clone(),
                    from_cache: true,
                };
            }
        }

        let source = &self.source;
        let timeout = policy.request_timeout;
        let attempted = retry_transient(policy.backoff, policy.max_retries, || {
            source.title_content(number, date, timeout)
        })
        .await;

        match attempted.result {
            Ok(text) => {
                let content = TitleContent::new(number, date, text);
                self.content.put(key, content.clone());
                ContentOutcome::Retrieved {
                    content,
                    from_cache: false,
                }
            }
            Err(FetchError::NotFound { .. }) => {
                tracing::info!(title = %number, date = %date, "title not available for date");
                ContentOutcome::NotFound
            }
            Err(error) if error.is_transient() => {
                tracing::warn!(
                    title = %number,
                    date = %date,
                    attempts = attempted.attempts,
                    "giving up on title: {error}"
                );
                ContentOutcome::Unavailable {
                    error,
                    attempts: attempted.attempts,
                }
            }
            Err(error) => {
                tracing::error!(title = %number, date = %date, "failed to fetch title: {error}");
                ContentOutcome::Failed(error)
            }
        }
    }
}
