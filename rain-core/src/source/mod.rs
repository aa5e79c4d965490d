//! Upstream precipitation sources.
//!
//! History comes from Meteostat's bulk daily files, recent days and the
//! short-range forecast from Open-Meteo. Both calls go through
//! [`RetryPolicy`]: the bulk endpoint occasionally serves a stale or
//! truncated file right after its nightly rebuild, so a failed attempt is
//! repeated with a growing delay instead of failing the run outright.

pub mod meteostat;
pub mod open_meteo;

use crate::{
    error::{RainError, Result},
    observation::{ObservationSeries, RecentObservations},
    site::Site,
};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use std::{future::Future, time::Duration};

const NO_QUERY: &[(&str, String)] = &[];

/// Supplies daily precipitation for a site.
#[allow(async_fn_in_trait)]
pub trait ObservationSource {
    /// Daily history within `[start, end]`.
    async fn fetch_history(
        &self,
        site: &Site,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationSeries>;

    /// Recent days, the current partial day and the short-range forecast.
    async fn fetch_recent(&self, site: &Site) -> Result<RecentObservations>;
}

/// Retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_tries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_tries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` until it succeeds or the tries are used up; the last
    /// error is returned.
    pub async fn run<T, F, Fut>(&self, what: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_tries = self.max_tries.max(1);
        let mut sleep_duration = self.initial_delay;
        let mut tries = 1;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if tries < max_tries => {
                    warn!("Attempt {}/{}: {} failed: {}", tries, max_tries, what, e);
                    info!(
                        "Sleeping for {} milliseconds before retry for {}",
                        sleep_duration.as_millis(),
                        what
                    );
                    tokio::time::sleep(sleep_duration).await;
                    sleep_duration *= 2;
                    tries += 1;
                }
                Err(e) => {
                    warn!("All attempts failed for {}", what);
                    return Err(e);
                }
            }
        }
    }
}

/// Meteostat bulk data for history, Open-Meteo for recent days and forecast.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    meteostat_url: String,
    open_meteo_url: String,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new() -> Result<HttpSource> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(HttpSource {
            client,
            meteostat_url: meteostat::BULK_DAILY_URL.to_string(),
            open_meteo_url: open_meteo::FORECAST_URL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_base_urls(mut self, meteostat_url: &str, open_meteo_url: &str) -> HttpSource {
        self.meteostat_url = meteostat_url.trim_end_matches('/').to_string();
        self.open_meteo_url = open_meteo_url.to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> HttpSource {
        self.retry = retry;
        self
    }

    async fn get_bytes(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
        info!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RainError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl ObservationSource for HttpSource {
    async fn fetch_history(
        &self,
        site: &Site,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationSeries> {
        let url = meteostat::station_url(&self.meteostat_url, site.station_id);
        let url_ref = url.as_str();
        let body = self
            .retry
            .run("historical fetch", move || self.get_bytes(url_ref, NO_QUERY))
            .await?;
        let mut observations = meteostat::parse_daily_gz(&body)?;
        observations.retain_between(start, end);
        info!(
            "{} historical days for station {} ({} without precipitation)",
            observations.len(),
            site.station_id,
            observations.missing_count()
        );
        Ok(observations)
    }

    async fn fetch_recent(&self, site: &Site) -> Result<RecentObservations> {
        let query = open_meteo::query(site);
        let url_ref = self.open_meteo_url.as_str();
        let query_ref = query.as_slice();
        let body = self
            .retry
            .run("recent fetch", move || self.get_bytes(url_ref, query_ref))
            .await?;
        let recent = open_meteo::parse_forecast(&body)?;
        info!(
            "{} recent days and {} hours ({} days without precipitation)",
            recent.daily.len(),
            recent.hourly.len(),
            recent.daily.missing_count()
        );
        Ok(recent)
    }
}
