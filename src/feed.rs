//! Client for the NeoWs feed, detail and browse endpoints.

use chrono::{Days, NaiveDate, Utc};
use reqwest::Url;
use tracing::{debug, error, info};

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json, get_request};
use crate::model::{BrowseResponse, FeedResponse, Neo};

pub const FEED_FAILED: &str = "Failed to fetch Near Earth Objects data";
pub const DETAIL_FAILED: &str = "Failed to fetch NEO details";
pub const LOOKUP_FAILED: &str = "Failed to lookup NEO";

/// Days covered by the initial load and by each "load more" step.
pub const DEFAULT_WINDOW_DAYS: u64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct NeoFeedClient<C> {
    http: UrlParam<C>,
    base_url: String,
}

impl NeoFeedClient<BasicClient> {
    pub fn from_config(config: &FeedConfig) -> anyhow::Result<Self> {
        Ok(Self::new(BasicClient::new()?, config))
    }
}

impl<C: HttpClient> NeoFeedClient<C> {
    pub fn new(inner: C, config: &FeedConfig) -> Self {
        Self {
            http: UrlParam::api_key(inner, config.api_key.clone()),
            base_url: config.base_url.clone(),
        }
    }

    /// Objects approaching between `start` and `end`, grouped by date exactly
    /// as upstream returns them.
    #[tracing::instrument(skip(self, start, end), fields(%start, %end))]
    pub async fn fetch_feed(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FeedResponse, FetchError> {
        let result: anyhow::Result<FeedResponse> = async {
            let mut url = self.endpoint("feed")?;
            url.query_pairs_mut()
                .append_pair("start_date", &start.format(DATE_FORMAT).to_string())
                .append_pair("end_date", &end.format(DATE_FORMAT).to_string());
            fetch_json::<_, FeedResponse>(&self.http, get_request(url)).await
        }
        .await;

        match result {
            Ok(feed) => {
                info!(
                    element_count = feed.element_count,
                    dates = feed.near_earth_objects.len(),
                    "Feed fetched"
                );
                Ok(feed)
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Error fetching NEO feed");
                Err(FetchError::new(FEED_FAILED))
            }
        }
    }

    /// Fetches `[start, start + window_days]`. Callers advance `start` by
    /// `window_days` to load the next window; repeats are not removed.
    pub async fn fetch_paginated_window(
        &self,
        start: NaiveDate,
        window_days: u64,
    ) -> Result<FeedResponse, FetchError> {
        let end = add_days(start, window_days);
        self.fetch_feed(start, end).await
    }

    pub async fn fetch_current_week(&self) -> Result<FeedResponse, FetchError> {
        let today = Utc::now().date_naive();
        self.fetch_paginated_window(today, DEFAULT_WINDOW_DAYS).await
    }

    /// Full record for one object, including orbital data.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_neo(&self, id: &str) -> Result<Neo, FetchError> {
        let result: anyhow::Result<Neo> = async {
            let mut url = self.endpoint("neo")?;
            url.path_segments_mut()
                .map_err(|_| anyhow::anyhow!("base URL cannot hold a path"))?
                .push(id);
            fetch_json::<_, Neo>(&self.http, get_request(url)).await
        }
        .await;

        result.map_err(|e| {
            error!(error = %format!("{e:#}"), "Error fetching NEO details");
            FetchError::new(DETAIL_FAILED)
        })
    }

    /// Finds an object on the first browse page by `id` or `neo_reference_id`.
    #[tracing::instrument(skip(self))]
    pub async fn lookup_neo(&self, id: &str) -> Result<Neo, FetchError> {
        let result: anyhow::Result<Neo> = async {
            let url = self.endpoint("neo/browse")?;
            let page: BrowseResponse = fetch_json(&self.http, get_request(url)).await?;
            debug!(candidates = page.near_earth_objects.len(), "Browse page fetched");
            page.near_earth_objects
                .into_iter()
                .find(|n| n.id == id || n.neo_reference_id == id)
                .ok_or_else(|| anyhow::anyhow!("NEO not found"))
        }
        .await;

        result.map_err(|e| {
            error!(error = %format!("{e:#}"), "Error looking up NEO");
            FetchError::new(LOOKUP_FAILED)
        })
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }
}

/// `start + days`, saturating at the last representable date.
pub fn add_days(start: NaiveDate, days: u64) -> NaiveDate {
    start
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
