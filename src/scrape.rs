//! Article page enrichment.
//!
//! Each headline URL is fetched and mined for three things: visible article
//! text, an `author` meta tag, and an `article:published_time` meta tag.
//! Every failure mode degrades to [`Enrichment::unavailable`] rather than an
//! error: unresponsive hosts, blocked requests (news sites 403 scrapers
//! freely), and pages with no recognizable structure are all expected.
//!
//! Results are memoized per URL in a bounded cache, failures included; the
//! same URL commonly recurs across differently-filtered queries in one
//! session and must not trigger a second fetch.

use crate::cache::{BoundedCache, DEFAULT_CAPACITY};
use crate::models::{Enrichment, UNKNOWN};
use crate::utils::{collapse_ws, truncate_chars, truncate_for_log};
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

/// Maximum stored length of scraped article text, in characters.
pub const CONTENT_CAP: usize = 500;

const SCRAPE_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Seam for fetching a page body as text.
///
/// The HTTP implementation is [`HttpPage`]; tests substitute counting or
/// failing fetchers to exercise memoization and degradation.
pub trait PageFetch {
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// `reqwest`-backed page fetcher with a scrape timeout and a browser-ish
/// User-Agent.
#[derive(Debug)]
pub struct HttpPage {
    client: reqwest::Client,
}

impl HttpPage {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(SCRAPE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetch for HttpPage {
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Memoizing article scraper.
///
/// Holds a bounded URL → [`Enrichment`] cache behind an async mutex so
/// concurrent enrichment tasks within one pipeline run share results.
#[derive(Debug)]
pub struct ArticleEnricher<F: PageFetch = HttpPage> {
    fetcher: F,
    cache: Mutex<BoundedCache<Enrichment>>,
}

impl ArticleEnricher<HttpPage> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpPage::new())
    }
}

impl Default for ArticleEnricher<HttpPage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PageFetch> ArticleEnricher<F> {
    /// Build an enricher over an arbitrary page fetcher.
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(BoundedCache::new(DEFAULT_CAPACITY)),
        }
    }

    /// Fetch and mine a single article page, memoized per URL.
    ///
    /// Never errors: transport failures, blocked responses, invalid URLs,
    /// and structureless pages all return the zero-value enrichment.
    #[instrument(level = "debug", skip(self))]
    pub async fn enrich(&self, url: &str) -> Enrichment {
        if let Some(hit) = self.cache.lock().await.get(url) {
            debug!(%url, "enrichment cache hit");
            return hit.clone();
        }

        let result = match Url::parse(url) {
            Ok(_) => match self.fetcher.get_text(url).await {
                Ok(html) => {
                    let enrichment = extract(&html);
                    debug!(
                        %url,
                        author = %enrichment.author,
                        published_at = %enrichment.published_at,
                        preview = %truncate_for_log(&enrichment.content, 120),
                        "Extracted article page"
                    );
                    enrichment
                }
                Err(e) => {
                    warn!(%url, error = %e, "article fetch failed; using empty enrichment");
                    Enrichment::unavailable()
                }
            },
            Err(e) => {
                warn!(%url, error = %e, "unparseable article URL; skipping fetch");
                Enrichment::unavailable()
            }
        };

        // Failures are cached too: a host that just refused us will refuse
        // the next call in the same session as well.
        self.cache
            .lock()
            .await
            .insert(url.to_string(), result.clone());
        result
    }
}

/// Pure extraction from a fetched page.
///
/// Content comes from the first `<article>` element, falling back to the
/// first `content`-classed `<div>`; author and publish time come from the
/// usual meta tags. Each field degrades independently.
fn extract(html: &str) -> Enrichment {
    let document = Html::parse_document(html);
    let article_sel = Selector::parse("article").unwrap();
    let content_sel = Selector::parse("div.content").unwrap();
    let author_sel = Selector::parse(r#"meta[name="author"]"#).unwrap();
    let published_sel = Selector::parse(r#"meta[property="article:published_time"]"#).unwrap();

    let container = document
        .select(&article_sel)
        .next()
        .or_else(|| document.select(&content_sel).next());
    let content = container
        .map(|el| {
            let text = el.text().collect::<Vec<_>>().join(" ");
            truncate_chars(&collapse_ws(&text), CONTENT_CAP)
        })
        .unwrap_or_default();

    let author = meta_content(&document, &author_sel).unwrap_or_else(|| UNKNOWN.to_string());
    let published_at =
        meta_content(&document, &published_sel).unwrap_or_else(|| UNKNOWN.to_string());

    Enrichment {
        content,
        author,
        published_at,
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
