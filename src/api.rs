//! Upstream top-headlines API client with retry and graceful degradation.
//!
//! The headline service is queried once per pipeline run. Query parameters
//! follow a strict precedence: a `source` filter excludes `category` and
//! `country` (the upstream treats them as mutually exclusive), a `category`
//! filter is always paired with `country`, and with neither set the query is
//! country-only general top headlines.
//!
//! # Architecture
//!
//! A trait seam keeps the transport swappable:
//! - [`FetchHeadlines`]: one async call from query to headline records
//! - [`NewsApiClient`]: the `reqwest` implementation
//! - [`RetryFetch`]: decorator adding exponential backoff with jitter
//!
//! # Failure policy
//!
//! Transport errors, non-2xx responses, and an explicit non-`ok` status
//! payload are all non-fatal: after retries are exhausted the caller gets an
//! empty headline list and the failure goes to the log, never to the caller
//! as an error.

use crate::models::Headline;
use rand::{Rng, rng};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const BASE_URL: &str = "https://newsapi.org/v2/top-headlines";
const API_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: usize = 2;

/// The fixed category vocabulary the upstream service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

/// One headline query: the three user-facing filters plus country.
#[derive(Debug, Clone)]
pub struct HeadlineQuery {
    pub category: Option<Category>,
    pub source: Option<String>,
    pub page_size: u32,
    pub country: String,
}

impl Default for HeadlineQuery {
    fn default() -> Self {
        Self {
            category: None,
            source: None,
            page_size: 10,
            country: "us".to_string(),
        }
    }
}

impl HeadlineQuery {
    /// Build upstream query parameters, applying the selection precedence:
    /// source alone, else category + country, else country alone.
    fn params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apiKey", api_key.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(source) = self.source.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sources", source.to_string()));
        } else if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
            params.push(("country", self.country.clone()));
        } else {
            params.push(("country", self.country.clone()));
        }
        params
    }
}

/// Upstream response envelope: `status` is `"ok"` or an error marker with
/// `code`/`message` alongside.
#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Headline>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Trait for one headline fetch.
///
/// Implementors turn a [`HeadlineQuery`] into raw [`Headline`] records.
/// This abstraction lets [`RetryFetch`] decorate any transport and lets
/// tests substitute canned responses.
pub trait FetchHeadlines {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<Headline>, Box<dyn Error>>;
}

impl<T: FetchHeadlines> FetchHeadlines for &T {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<Headline>, Box<dyn Error>> {
        (*self).fetch(query).await
    }
}

/// `reqwest`-backed client for the top-headlines endpoint.
#[derive(Debug)]
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }
}

impl FetchHeadlines for NewsApiClient {
    #[instrument(level = "info", skip_all)]
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<Headline>, Box<dyn Error>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&query.params(&self.api_key))
            .send()
            .await?
            .error_for_status()?;

        let body: HeadlinesResponse = response.json().await?;
        if body.status != "ok" {
            return Err(format!(
                "upstream status {:?} (code {:?}): {}",
                body.status,
                body.code,
                body.message.as_deref().unwrap_or("no message")
            )
            .into());
        }

        info!(count = body.articles.len(), "Fetched headlines");
        Ok(body.articles)
    }
}

/// Decorator adding exponential backoff retry to any [`FetchHeadlines`].
///
/// Delay doubles per attempt from `base_delay`, is capped at `max_delay`,
/// and carries 0-250ms of random jitter.
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: FetchHeadlines> RetryFetch<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl<T: FetchHeadlines> FetchHeadlines for RetryFetch<T> {
    async fn fetch(&self, query: &HeadlineQuery) -> Result<Vec<Headline>, Box<dyn Error>> {
        let mut attempt = 0usize;
        loop {
            match self.inner.fetch(query).await {
                Ok(headlines) => return Ok(headlines),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(attempt, max = self.max_retries, error = %e, "headline fetch exhausted retries");
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(attempt, max = self.max_retries, ?delay, error = %e, "headline fetch failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Fetch headlines with retry, degrading to an empty list on final failure.
///
/// This is the pipeline's entry point to the headline service; it never
/// returns an error, per the aggregation contract that an unreachable
/// upstream yields zero headlines rather than an aborted run.
#[instrument(level = "info", skip(source))]
pub async fn fetch_with_backoff<T: FetchHeadlines>(
    source: &T,
    query: &HeadlineQuery,
) -> Vec<Headline> {
    let retry = RetryFetch::new(source, MAX_RETRIES, Duration::from_millis(500));
    match retry.fetch(query).await {
        Ok(headlines) => headlines,
        Err(e) => {
            error!(error = %e, "headline service unavailable; continuing with zero headlines");
            Vec::new()
        }
    }
}
