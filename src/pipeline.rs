//! The aggregation pipeline: fetch → enrich → reconcile → dedupe → summarize.
//!
//! One [`Aggregator::run`] call fetches a headline batch, enriches every
//! headline that carries a URL (bounded concurrency, input order preserved),
//! reconciles metadata gaps with text heuristics, deduplicates by URL keeping
//! the first occurrence, and replaces the held article collection. Every
//! stage builds new values; no record is mutated in place across stages.
//!
//! Failures never cross component boundaries: an unreachable upstream or a
//! page that refuses to be scraped degrades locally, and the only signal the
//! caller ever checks is whether [`Aggregator::articles`] came out empty.

use crate::api::{FetchHeadlines, HeadlineQuery, NewsApiClient, fetch_with_backoff};
use crate::heuristics;
use crate::models::{Article, CONTENT_NOT_AVAILABLE, Distribution, Enrichment, Headline, UNKNOWN};
use crate::scrape::{ArticleEnricher, CONTENT_CAP, HttpPage, PageFetch};
use crate::utils::truncate_chars;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Upper bound on concurrent article scrapes within one run.
const PARALLEL_SCRAPES: usize = 8;

/// Orchestrates the headline source, the enricher, and the text heuristics,
/// holding at most one generation of articles at a time.
pub struct Aggregator<S: FetchHeadlines = NewsApiClient, F: PageFetch = HttpPage> {
    source: S,
    enricher: ArticleEnricher<F>,
    articles: Vec<Article>,
}

impl Aggregator<NewsApiClient, HttpPage> {
    /// Build the production aggregator against the live headline service.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_parts(NewsApiClient::new(api_key), ArticleEnricher::new())
    }
}

impl<S: FetchHeadlines, F: PageFetch> Aggregator<S, F> {
    /// Build an aggregator from explicit components.
    pub fn with_parts(source: S, enricher: ArticleEnricher<F>) -> Self {
        Self {
            source,
            enricher,
            articles: Vec::new(),
        }
    }

    /// Execute one full aggregation pass, replacing the previous article
    /// generation. An empty outcome is a reportable condition, not an error;
    /// callers check [`Aggregator::articles`].
    #[instrument(level = "info", skip(self))]
    pub async fn run(&mut self, query: &HeadlineQuery) {
        let headlines = fetch_with_backoff(&self.source, query).await;
        info!(count = headlines.len(), "Headlines fetched; enriching");

        // `buffered` (not `buffer_unordered`) keeps completion in input
        // order, which the first-occurrence dedup rule depends on.
        let enricher = &self.enricher;
        let merged: Vec<Article> = stream::iter(headlines)
            .map(|headline| async move {
                let url = headline.url.clone().filter(|u| !u.is_empty());
                let enrichment = match url.as_deref() {
                    Some(u) => enricher.enrich(u).await,
                    None => Enrichment::unavailable(),
                };
                reconcile(headline, enrichment)
            })
            .buffered(PARALLEL_SCRAPES)
            .collect()
            .await;

        self.articles = dedupe_by_url(merged);
        if self.articles.is_empty() {
            warn!("run produced zero articles");
        } else {
            info!(count = self.articles.len(), "Aggregation complete");
        }
    }

    /// The current article generation, in first-occurrence order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Article count per source name, recomputed from the current
    /// collection on every call.
    pub fn distribution(&self) -> Distribution {
        let mut counts = Distribution::new();
        for article in &self.articles {
            *counts.entry(article.source_name.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Merge a headline with its enrichment into a display-ready [`Article`].
///
/// Content precedence: scraped text, else the upstream `description`, else
/// the upstream snippet, else a fixed placeholder. Heuristics fill only
/// fields the scrape left as `"Unknown"`; a structured value is never
/// overwritten. A heuristic-derived date is already in display form and
/// skips ISO re-parsing.
fn reconcile(headline: Headline, enrichment: Enrichment) -> Article {
    let content = if !enrichment.content.is_empty() {
        enrichment.content
    } else {
        headline
            .description
            .filter(|d| !d.is_empty())
            .or(headline.raw_content.filter(|c| !c.is_empty()))
            .map(|text| truncate_chars(&text, CONTENT_CAP))
            .unwrap_or_else(|| CONTENT_NOT_AVAILABLE.to_string())
    };

    let author = if enrichment.author == UNKNOWN {
        heuristics::extract_author(&content).unwrap_or(enrichment.author)
    } else {
        enrichment.author
    };

    let published_at = if enrichment.published_at == UNKNOWN {
        // Heuristic output is already ordinal display form (or raw text
        // preserved on parse failure); either way it bypasses re-parsing.
        heuristics::extract_date(&content).unwrap_or(enrichment.published_at)
    } else {
        heuristics::display_date_from_iso(&enrichment.published_at)
            .unwrap_or(enrichment.published_at)
    };

    Article {
        title: headline
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        url: headline.url,
        source_name: headline
            .source
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        author,
        published_at,
        content,
    }
}

/// Keep the first occurrence of every non-empty URL, preserving order.
/// Articles without a URL cannot collide and are always kept.
fn dedupe_by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(articles.len());
    for article in articles {
        match article.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => {
                if seen.insert(url.to_string()) {
                    unique.push(article);
                }
            }
            None => unique.push(article),
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn headline(url: Option<&str>, source: Option<&str>) -> Headline {
        let mut json = serde_json::Map::new();
        json.insert("title".into(), "A story".into());
        if let Some(u) = url {
            json.insert("url".into(), u.into());
        }
        if let Some(s) = source {
            json.insert(
                "source".into(),
                serde_json::json!({ "id": null, "name": s }),
            );
        }
        serde_json::from_value(serde_json::Value::Object(json)).unwrap()
    }

    fn article(url: Option<&str>) -> Article {
        Article {
            title: "t".to_string(),
            url: url.map(str::to_string),
            source_name: "s".to_string(),
            author: UNKNOWN.to_string(),
            published_at: UNKNOWN.to_string(),
            content: "c".to_string(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let out = dedupe_by_url(vec![article(Some("a")), article(Some("a")), article(Some("b"))]);
        let urls: Vec<_> = out.iter().map(|a| a.url.as_deref().unwrap()).collect();
        assert_eq!(urls, ["a", "b"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let input = vec![
            article(Some("a")),
            article(None),
            article(Some("b")),
            article(Some("a")),
        ];
        let once = dedupe_by_url(input);
        let labels: Vec<_> = once.iter().map(|a| a.url.clone()).collect();
        let twice = dedupe_by_url(once);
        let labels_twice: Vec<_> = twice.iter().map(|a| a.url.clone()).collect();
        assert_eq!(labels, labels_twice);
    }

    #[test]
    fn test_dedupe_keeps_all_urlless_articles() {
        let out = dedupe_by_url(vec![article(None), article(None), article(Some("a"))]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_reconcile_prefers_scraped_content() {
        let mut h = headline(Some("https://x/a"), Some("Wire"));
        h.description = Some("api description".to_string());
        let e = Enrichment {
            content: "scraped text".to_string(),
            author: UNKNOWN.to_string(),
            published_at: UNKNOWN.to_string(),
        };
        assert_eq!(reconcile(h, e).content, "scraped text");
    }

    #[test]
    fn test_reconcile_fallback_prefers_description_over_snippet() {
        let mut h = headline(Some("https://x/a"), None);
        h.description = Some("the description".to_string());
        h.raw_content = Some("the snippet".to_string());
        let a = reconcile(h, Enrichment::unavailable());
        assert_eq!(a.content, "the description");
    }

    #[test]
    fn test_reconcile_fallback_snippet_then_placeholder() {
        let mut h = headline(Some("https://x/a"), None);
        h.raw_content = Some("the snippet".to_string());
        assert_eq!(reconcile(h, Enrichment::unavailable()).content, "the snippet");

        let bare = headline(Some("https://x/b"), None);
        assert_eq!(
            reconcile(bare, Enrichment::unavailable()).content,
            CONTENT_NOT_AVAILABLE
        );
    }

    #[test]
    fn test_reconcile_heuristics_fill_unknown_fields() {
        let mut h = headline(Some("https://x/a"), None);
        h.description = Some("By Jane Smith May 17, 2025 the rest".to_string());
        let a = reconcile(h, Enrichment::unavailable());
        assert!(a.author.starts_with("Jane Smith"));
        assert_eq!(a.published_at, "17th May, 2025");
    }

    #[test]
    fn test_reconcile_never_overwrites_known_author() {
        let mut h = headline(Some("https://x/a"), None);
        h.description = Some("By Someone Else May 17, 2025".to_string());
        let e = Enrichment {
            content: String::new(),
            author: "Structured Author".to_string(),
            published_at: UNKNOWN.to_string(),
        };
        let a = reconcile(h, e);
        assert_eq!(a.author, "Structured Author");
    }

    #[test]
    fn test_reconcile_normalizes_iso_date() {
        let h = headline(Some("https://x/a"), None);
        let e = Enrichment {
            content: "text".to_string(),
            author: "A".to_string(),
            published_at: "2025-05-17T08:30:00Z".to_string(),
        };
        assert_eq!(reconcile(h, e).published_at, "17th May, 2025");
    }

    #[test]
    fn test_reconcile_passes_unparseable_date_verbatim() {
        let h = headline(Some("https://x/a"), None);
        let e = Enrichment {
            content: "text".to_string(),
            author: "A".to_string(),
            published_at: "last Tuesday".to_string(),
        };
        assert_eq!(reconcile(h, e).published_at, "last Tuesday");
    }

    #[test]
    fn test_reconcile_defaults_source_name() {
        let a = reconcile(headline(None, None), Enrichment::unavailable());
        assert_eq!(a.source_name, UNKNOWN);
    }

    // -- mock components for whole-pipeline runs --

    struct CannedSource(Vec<Headline>);

    impl FetchHeadlines for CannedSource {
        async fn fetch(&self, _query: &HeadlineQuery) -> Result<Vec<Headline>, Box<dyn Error>> {
            Ok(self.0.clone())
        }
    }

    struct StaticPage(&'static str);

    impl PageFetch for StaticPage {
        async fn get_text(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_empty_upstream_yields_empty_collection() {
        let mut agg = Aggregator::with_parts(
            CannedSource(Vec::new()),
            ArticleEnricher::with_fetcher(StaticPage("")),
        );
        agg.run(&HeadlineQuery::default()).await;

        assert!(agg.articles().is_empty());
        assert!(agg.distribution().is_empty());
    }

    #[tokio::test]
    async fn test_run_dedupes_and_counts_by_source() {
        let page = "<article>By Jane Smith May 17, 2025 story body</article>";
        let source = CannedSource(vec![
            headline(Some("https://x/a"), Some("Alpha")),
            headline(Some("https://x/a"), Some("Alpha")),
            headline(Some("https://x/b"), Some("Beta")),
            headline(None, Some("Alpha")),
        ]);
        let mut agg =
            Aggregator::with_parts(source, ArticleEnricher::with_fetcher(StaticPage(page)));
        agg.run(&HeadlineQuery::default()).await;

        assert_eq!(agg.articles().len(), 3);
        let dist = agg.distribution();
        assert_eq!(dist.get("Alpha"), Some(&2));
        assert_eq!(dist.get("Beta"), Some(&1));
    }

    #[tokio::test]
    async fn test_run_replaces_previous_generation() {
        let page = "<article>body</article>";
        let source = CannedSource(vec![headline(Some("https://x/a"), Some("Alpha"))]);
        let mut agg =
            Aggregator::with_parts(source, ArticleEnricher::with_fetcher(StaticPage(page)));

        agg.run(&HeadlineQuery::default()).await;
        assert_eq!(agg.articles().len(), 1);

        agg.source = CannedSource(Vec::new());
        agg.run(&HeadlineQuery::default()).await;
        assert!(agg.articles().is_empty());
    }
}
