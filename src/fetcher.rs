//! HTTP client for the public COVID-19 API.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{CountryHistoryPoint, GlobalSummary, StatusCategory};

/// Read-only operations the dashboard needs from the API.
///
/// Failures are returned as-is: no retry, no timeout override, no recovery.
#[async_trait]
pub trait CovidApi: Send + Sync {
    async fn fetch_global_summary(&self) -> Result<GlobalSummary>;

    async fn fetch_country_history(
        &self,
        country_code: &str,
        status: StatusCategory,
    ) -> Result<Vec<CountryHistoryPoint>>;
}

/// [`CovidApi`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCovidApi {
    client: Client,
    base_url: Url,
}

impl HttpCovidApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("covid-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = Url::parse(base_url).map_err(|e| {
            DashboardError::InvalidConfig(format!("API base '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::InvalidConfig(format!(
                "API base '{}' cannot take a path",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base path, percent-encoding each one so a
    /// segment can never add path levels or a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DashboardError::InvalidConfig(format!(
                    "API base '{}' cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn summary_url(&self) -> Result<Url> {
        self.endpoint(&["summary"])
    }

    fn history_url(&self, country_code: &str, status: StatusCategory) -> Result<Url> {
        self.endpoint(&["country", country_code, "status", status.as_str()])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CovidApi for HttpCovidApi {
    async fn fetch_global_summary(&self) -> Result<GlobalSummary> {
        self.get_json(self.summary_url()?).await
    }

    async fn fetch_country_history(
        &self,
        country_code: &str,
        status: StatusCategory,
    ) -> Result<Vec<CountryHistoryPoint>> {
        self.get_json(self.history_url(country_code, status)?).await
    }
}
