//! HTTP client for the OneBusAway-style REST API.
//!
//! [`ObaClient`] owns the connection pool, URL construction, the
//! transient/protocol error split, and a bounded linear-backoff retry for
//! transient faults. It implements [`TransitSource`], which is the only
//! interface the rest of the workspace sees.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;

use linkboard_types::{ArrivalRecord, Route};

use crate::error::UpstreamError;
use crate::source::{RouteStops, TransitSource};
use crate::wire::{ArrivalsData, Envelope, RouteListData, StopsForRouteData};

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct ObaConfig {
    /// Base URL of the upstream API, without a trailing slash.
    pub base_url: String,
    /// API key sent as the `key` query parameter on every call.
    pub api_key: String,
    /// How many times a transient failure is re-attempted before it is
    /// surfaced.
    pub max_retries: u32,
    /// Base backoff between attempts; attempt `n` waits `n * retry_delay`.
    pub retry_delay: Duration,
}

impl Default for ObaConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.pugetsound.onebusaway.org"),
            api_key: String::from("TEST"),
            max_retries: 3,
            retry_delay: Duration::from_millis(250),
        }
    }
}

/// Client for the upstream transit API.
#[derive(Debug, Clone)]
pub struct ObaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl ObaClient {
    /// Create a client from configuration. A trailing slash on the base
    /// URL is tolerated.
    #[must_use]
    pub fn new(config: &ObaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        }
    }

    /// Fetch an endpoint, unwrap the envelope, and retry transient faults
    /// up to the configured bound.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt: u32 = 0;
        loop {
            match self.fetch_once::<T>(&url, query).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt = attempt.saturating_add(1);
                    let wait = self.retry_delay.saturating_mul(attempt);
                    warn!(%url, error = %e, attempt, "transient upstream failure, retrying");
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One request/decode cycle, classified into the error taxonomy.
    async fn fetch_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(UpstreamError::Transient(format!("upstream returned {status}")));
        }
        if !status.is_success() {
            return Err(UpstreamError::Protocol(format!("upstream returned {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Protocol(format!("response decode failed: {e}")))?;

        if envelope.code != 200 {
            return Err(UpstreamError::Protocol(format!(
                "upstream envelope code {}",
                envelope.code
            )));
        }

        Ok(envelope.data)
    }
}

impl TransitSource for ObaClient {
    async fn routes_for_agency(&self, agency_id: &str) -> Result<Vec<Route>, UpstreamError> {
        let path = format!("/api/where/routes-for-agency/{agency_id}.json");
        let data: RouteListData = self.get_data(&path, &[]).await?;
        Ok(data.list.into_iter().map(Route::from).collect())
    }

    async fn stops_for_route(&self, route_id: &str) -> Result<RouteStops, UpstreamError> {
        let path = format!("/api/where/stops-for-route/{route_id}.json");
        let data: StopsForRouteData = self
            .get_data(&path, &[("includePolylines", String::from("false"))])
            .await?;
        Ok(RouteStops::from(data))
    }

    async fn arrivals_for_stop(
        &self,
        stop_id: &str,
        horizon_minutes: u32,
    ) -> Result<Vec<ArrivalRecord>, UpstreamError> {
        let path = format!("/api/where/arrivals-and-departures-for-stop/{stop_id}.json");
        let data: ArrivalsData = self
            .get_data(&path, &[("minutesAfter", horizon_minutes.to_string())])
            .await?;
        Ok(data
            .entry
            .arrivals_and_departures
            .into_iter()
            .map(ArrivalRecord::from)
            .collect())
    }
}
