//! Command-line interface definitions for newsdesk.
//!
//! All options map onto one [`HeadlineQuery`] plus output switches. The API
//! key resolves from the `NEWS_API_KEY` environment variable with a
//! placeholder fallback, matching how the upstream service expects keys to
//! be supplied.

use crate::api::{Category, HeadlineQuery};
use clap::Parser;

/// Command-line arguments for the newsdesk aggregator.
///
/// # Examples
///
/// ```sh
/// # General US top headlines
/// newsdesk
///
/// # Technology headlines, 25 at a time, with the distribution chart
/// newsdesk -c technology -n 25 --distribution
///
/// # A single outlet, written out as JSON
/// newsdesk -s bbc-news -o articles.json
/// ```
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Headline category (dropped when --source is set; the upstream treats
    /// them as mutually exclusive)
    #[arg(short, long, value_enum)]
    pub category: Option<Category>,

    /// Upstream source identifier, e.g. "bbc-news"
    #[arg(short, long)]
    pub source: Option<String>,

    /// Number of headlines to request
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Two-letter country code for top headlines
    #[arg(long, default_value = "us")]
    pub country: String,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", default_value = "YOUR_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Also print the source distribution chart
    #[arg(short, long)]
    pub distribution: bool,

    /// Write the article collection to this JSON file
    #[arg(short, long)]
    pub output: Option<String>,
}

impl Cli {
    /// The headline query these arguments describe.
    pub fn query(&self) -> HeadlineQuery {
        HeadlineQuery {
            category: self.category,
            source: self.source.clone(),
            page_size: self.page_size,
            country: self.country.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["newsdesk"]);
        assert_eq!(cli.page_size, 10);
        assert_eq!(cli.country, "us");
        assert!(cli.category.is_none());
        assert!(cli.source.is_none());
        assert!(!cli.distribution);
    }

    #[test]
    fn test_category_and_page_size() {
        let cli = Cli::parse_from(["newsdesk", "-c", "technology", "-n", "25"]);
        assert_eq!(cli.category, Some(Category::Technology));
        assert_eq!(cli.page_size, 25);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(Cli::try_parse_from(["newsdesk", "-n", "0"]).is_err());
    }

    #[test]
    fn test_query_mapping() {
        let cli = Cli::parse_from(["newsdesk", "-s", "bbc-news", "--country", "gb"]);
        let query = cli.query();
        assert_eq!(query.source.as_deref(), Some("bbc-news"));
        assert_eq!(query.country, "gb");
    }
}
