use crate::auth::build_header;
use crate::config::ResolvedConfig;
use crate::constants::{DAY_FORMAT, MEASURING_POINTS_PATH, WSSE_HEADER};
use crate::errors::{AppError, AppResult};
use crate::models::{Credentials, MeasuringPoint, MeasuringPointId, Record};
use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the Enelogic REST API.
///
/// Holds the credentials and signs every request with a fresh `X-WSSE` header.
pub struct EnelogicClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl EnelogicClient {
    /// Creates a client rooted at `base_url` (e.g. `https://enelogic.com/api`).
    ///
    /// # Errors
    ///
    /// Returns `UrlError` if the base URL is invalid and `NetworkError` if the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> AppResult<Self> {
        // Url::join drops the last segment unless the base ends with a slash
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn from_config(credentials: Credentials, config: &ResolvedConfig) -> AppResult<Self> {
        config.validate()?;
        Self::new(&config.base_url, credentials, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lists all measuring points keyed by id.
    pub async fn measuring_points(&self) -> AppResult<BTreeMap<MeasuringPointId, MeasuringPoint>> {
        let url = self.base_url.join(MEASURING_POINTS_PATH)?;
        let points: Vec<MeasuringPoint> = self.get_json(url).await?;
        Ok(points.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    /// Fetches the datapoints of one measuring point for `[from, to)`.
    pub async fn datapoints(
        &self,
        point_id: &MeasuringPointId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Record>> {
        let url = self.base_url.join(&format!(
            "{MEASURING_POINTS_PATH}{point_id}/datapoints/{}/{}",
            from.format(DAY_FORMAT),
            to.format(DAY_FORMAT)
        ))?;
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        debug!(url = %url, "Sending request");

        // The header is time-sensitive, so it is built right before sending
        let header = build_header(&self.credentials);
        let response = self
            .http
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(WSSE_HEADER, header.header_value())
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let response = response.error_for_status().map_err(|e| {
            AppError::NetworkError(format!("HTTP {}: Request to {url} failed: {e}", status.as_u16()))
        })?;

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::ParseError(format!("Invalid JSON from {url}: {e}")))
    }
}
