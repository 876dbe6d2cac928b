//! # newsdesk
//!
//! A news aggregation pipeline that fetches top-headline metadata from a
//! news API, enriches each headline by scraping its article page, reconciles
//! the two unreliable sources, and summarizes the result.
//!
//! ## Features
//!
//! - Top-headlines queries by category, source, or country
//! - Best-effort article scraping: content container, author and publish
//!   date meta tags, with text heuristics as a last resort
//! - Per-URL memoized scraping behind a bounded cache
//! - URL deduplication preserving first-occurrence order
//! - Text-block article rendering, an ASCII source-distribution chart, and
//!   optional JSON output
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... newsdesk -c technology -n 20 --distribution
//! ```
//!
//! ## Architecture
//!
//! One `run` is a straight pipeline:
//! 1. **Fetch**: one headline-service query (retried, then degraded to empty)
//! 2. **Enrich**: scrape each headline URL, bounded concurrency, memoized
//! 3. **Reconcile**: fill gaps from descriptions and text heuristics
//! 4. **Dedupe**: first occurrence per URL wins
//! 5. **Render**: text blocks, distribution chart, optional JSON file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cache;
mod cli;
mod heuristics;
mod models;
mod outputs;
mod pipeline;
mod scrape;
mod utils;

use cli::Cli;
use outputs::{chart, json, text};
use pipeline::Aggregator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("newsdesk starting up");

    let args = Cli::parse();
    let query = args.query();
    debug!(?query, "Parsed CLI arguments");

    let mut aggregator = Aggregator::new(args.api_key.clone());
    aggregator.run(&query).await;

    if aggregator.articles().is_empty() {
        // Not an error: an unreachable upstream or an over-narrow filter
        // both surface here as an ordinary empty result.
        println!("No articles found.");
        return Ok(());
    }

    print!("{}", text::article_blocks(aggregator.articles()));

    if args.distribution {
        println!();
        print!("{}", chart::distribution_chart(&aggregator.distribution()));
    }

    if let Some(ref output) = args.output {
        if let Err(e) = json::write_articles(aggregator.articles(), output).await {
            error!(path = %output, error = %e, "Failed to write JSON output");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        articles = aggregator.articles().len(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
