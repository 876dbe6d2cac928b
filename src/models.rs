//! Data models for headlines and their enriched representations.
//!
//! Three stages of the same story flow through the pipeline:
//! - [`Headline`]: the raw record as returned by the upstream headline API
//! - [`Enrichment`]: whatever the scraper could pull out of the article page
//! - [`Article`]: the reconciled, display-ready union of the two
//!
//! Each stage produces a new value; nothing mutates a record in place across
//! stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel for author/date fields the scraper could not resolve.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder content when neither the scrape nor the upstream record
/// provided any text.
pub const CONTENT_NOT_AVAILABLE: &str = "Content not available";

/// A raw headline record as returned by the upstream top-headlines API.
///
/// Field names mirror the upstream JSON: `source` is a nested object with a
/// `name`, and `content` is the API's own truncated snippet (kept here as
/// `raw_content` to distinguish it from scraped content).
#[derive(Debug, Clone, Deserialize)]
pub struct Headline {
    /// The headline text.
    #[serde(default)]
    pub title: Option<String>,
    /// Link to the full article; absent for some syndicated records.
    #[serde(default)]
    pub url: Option<String>,
    /// The publishing outlet.
    #[serde(default)]
    pub source: SourceRef,
    /// Short upstream-provided summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Upstream-provided content snippet.
    #[serde(default, rename = "content")]
    pub raw_content: Option<String>,
}

/// The `source` object nested inside an upstream headline record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Best-effort metadata scraped from an article page.
///
/// Every field degrades independently: a page with an `<article>` body but no
/// meta tags yields real `content` and `Unknown` author/date.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// Visible article text, capped at [`crate::scrape::CONTENT_CAP`] chars.
    /// Empty when no recognizable container was found.
    pub content: String,
    /// From the `author` meta tag, or `"Unknown"`.
    pub author: String,
    /// From the `article:published_time` meta tag, or `"Unknown"`.
    /// Free-form: may be ISO-8601 or whatever the page embedded.
    pub published_at: String,
}

impl Enrichment {
    /// The zero-value result every scrape failure degrades to.
    pub fn unavailable() -> Self {
        Self {
            content: String::new(),
            author: UNKNOWN.to_string(),
            published_at: UNKNOWN.to_string(),
        }
    }

    /// True when the scrape produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.author == UNKNOWN && self.published_at == UNKNOWN
    }
}

/// A fully reconciled article, ready for display or JSON output.
///
/// Exactly one `Article` per distinct non-empty `url` survives a pipeline
/// run; articles without a URL are passed through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source_name: String,
    pub author: String,
    /// Normalized display form, e.g. `"17th May, 2025"`, or the raw value
    /// when it did not parse.
    pub published_at: String,
    pub content: String,
}

/// Count of articles grouped by source name, in source-name order.
pub type Distribution = BTreeMap<String, usize>;
