//! HTTP access to the bulletin board feed endpoints.
//!
//! Transport policy only: each request is retried up to the configured
//! number of attempts with exponential backoff, and a failure that survives
//! the retries surfaces as a typed [`FeedError`] naming the endpoint. The
//! caller decides what a missing feed means; this layer never substitutes
//! data.

use std::time::Duration;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::FeedsConfig;
use crate::domain::CapacityReport;
use crate::error::FeedError;

pub const CAPACITY_OUTLOOK_PATH: &str = "capacityOutlook/current";
pub const MEDIUM_TERM_CAPACITY_PATH: &str = "mediumTermCapacity/current";

#[derive(Clone)]
pub struct FeedClient {
    http: ClientWithMiddleware,
    base_url: String,
}

impl FeedClient {
    pub fn new(cfg: &FeedsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("gbb-engine/0.2"));
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(
                Duration::from_millis(cfg.retry_base_delay_ms),
                Duration::from_secs(30),
            )
            .build_with_max_retries(cfg.retry_max_attempts);
        let http = reqwest_middleware::ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn capacity_outlook(&self) -> Result<CapacityReport, FeedError> {
        self.get_json(CAPACITY_OUTLOOK_PATH).await
    }

    pub async fn medium_term_capacity(&self) -> Result<CapacityReport, FeedError> {
        self.get_json(MEDIUM_TERM_CAPACITY_PATH).await
    }

    /// Fetch one monthly actual-flow payload. `Ok(None)` when the month is
    /// not published (older months routinely are not), which is not a load
    /// failure.
    pub async fn monthly_flow(&self, month: &str) -> Result<Option<String>, FeedError> {
        self.get_optional_text(&format!("actualFlow/{month}.csv")).await
    }

    /// Fetch one monthly large-user-consumption payload. Missing months are
    /// tolerated as for [`Self::monthly_flow`].
    pub async fn monthly_consumption(&self, month: &str) -> Result<Option<String>, FeedError> {
        self.get_optional_text(&format!("largeUserConsumption/{month}.csv")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let response = self
            .http
            .get(format!("{}/{path}", self.base_url))
            .send()
            .await
            .map_err(|source| FeedError::Request { endpoint: path.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { endpoint: path.to_string(), status });
        }
        let body = response
            .text()
            .await
            .map_err(|source| FeedError::Body { endpoint: path.to_string(), source })?;
        serde_json::from_str(&body).map_err(|err| FeedError::Decode {
            endpoint: path.to_string(),
            detail: err.to_string(),
        })
    }

    async fn get_optional_text(&self, path: &str) -> Result<Option<String>, FeedError> {
        let response = self
            .http
            .get(format!("{}/{path}", self.base_url))
            .send()
            .await
            .map_err(|source| FeedError::Request { endpoint: path.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            debug!(endpoint = path, %status, "monthly payload unavailable, skipping");
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|source| FeedError::Body { endpoint: path.to_string(), source })?;
        Ok(Some(body))
    }
}

/// `YYYY-MM` keys for the trailing `months_back` months ending at `today`,
/// newest first.
pub fn month_keys(today: NaiveDate, months_back: u32) -> Vec<String> {
    (0..months_back)
        .map(|i| {
            let total = today.year() * 12 + today.month0() as i32 - i as i32;
            let year = total.div_euclid(12);
            let month = total.rem_euclid(12) + 1;
            format!("{year:04}-{month:02}")
        })
        .collect()
}
