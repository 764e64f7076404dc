//! HTTP client for the eCFR service.
//!
//! Wraps a `reqwest::Client` with the configured base URL. Every request
//! carries its own timeout so the slow full-text endpoint and the fast
//! catalog endpoints can be bounded differently. Retries are NOT built into
//! the client; the retriever owns retry policy.

use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use url::Url;

use regtally_core::{Agency, Title, TitleNumber};

use crate::config::{ConfigError, EcfrConfig};
use crate::error::FetchError;
use crate::payload::{AgenciesResponse, TitlesResponse};
use crate::source::CatalogSource;

const USER_AGENT: &str = concat!("regtally/", env!("CARGO_PKG_VERSION"));

/// Typed client for the eCFR admin and versioner APIs.
#[derive(Debug, Clone)]
pub struct EcfrClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EcfrClient {
    /// Create a client from configuration.
    pub fn new(config: EcfrConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// GET `path` and return the body of a 2xx response.
    async fn get_text(&self, path: &str, timeout: Duration) -> Result<String, FetchError> {
        let endpoint = format!("GET {path}");
        tracing::debug!(%endpoint, ?timeout, "eCFR request");

        let resp = self
            .http
            .get(self.url(path))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&endpoint, &e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::from_status(&endpoint, status.as_u16(), &body));
        }

        resp.text()
            .await
            .map_err(|e| FetchError::from_reqwest(&endpoint, &e))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, FetchError> {
        let body = self.get_text(path, timeout).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            endpoint: format!("GET {path}"),
            reason: e.to_string(),
        })
    }
}

/// Path of the full XML of `number` as of `date`.
pub fn title_content_path(number: TitleNumber, date: NaiveDate) -> String {
    format!(
        "/api/versioner/v1/full/{}/title-{}.xml",
        date.format("%Y-%m-%d"),
        number
    )
}

/// Path of the agency catalog.
pub const AGENCIES_PATH: &str = "/api/admin/v1/agencies.json";

/// Path of the title catalog.
pub const TITLES_PATH: &str = "/api/versioner/v1/titles.json";

impl CatalogSource for EcfrClient {
    async fn agencies(&self, timeout: Duration) -> Result<Vec<Agency>, FetchError> {
        let response: AgenciesResponse = self.get_json(AGENCIES_PATH, timeout).await?;
        response.into_agencies().map_err(|e| FetchError::Decode {
            endpoint: format!("GET {AGENCIES_PATH}"),
            reason: e.to_string(),
        })
    }

    async fn titles(&self, timeout: Duration) -> Result<Vec<Title>, FetchError> {
        let response: TitlesResponse = self.get_json(TITLES_PATH, timeout).await?;
        Ok(response.into_titles())
    }

    async fn title_content(
        &self,
        number: TitleNumber,
        date: NaiveDate,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        self.get_text(&title_content_path(number, date), timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_path_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let number = TitleNumber::new(12).unwrap();
        assert_eq!(
            title_content_path(number, date),
            "/api/versioner/v1/full/2024-03-07/title-12.xml"
        );
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client =
            EcfrClient::new(EcfrConfig::with_base_url("http://localhost:8080/").unwrap()).unwrap();
        assert_eq!(
            client.url(TITLES_PATH),
            "http://localhost:8080/api/versioner/v1/titles.json"
        );
    }
}
