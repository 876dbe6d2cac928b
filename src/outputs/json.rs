//! JSON output for downstream consumers.
//!
//! Writes the current article collection to a single JSON file, creating
//! parent directories as needed.

use crate::models::Article;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize the article collection to pretty JSON at `path`.
#[instrument(level = "info", skip(articles), fields(path = %path.as_ref().display()))]
pub async fn write_articles(
    articles: &[Article],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(articles)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, json).await?;
    info!(count = articles.len(), "Wrote article JSON");
    Ok(())
}
