//! Plain-text rendering of the article collection.
//!
//! Each article becomes a labeled block with a short content preview,
//! blocks separated by a dashed rule. This mirrors what a reader expects
//! from a terminal news digest: title, outlet, byline, date, teaser.

use crate::models::Article;
use crate::utils::truncate_chars;

/// Characters of article content shown in the preview line.
const PREVIEW_LEN: usize = 100;

const SEPARATOR_LEN: usize = 50;

/// Render the whole collection as newline-joined text blocks.
pub fn article_blocks(articles: &[Article]) -> String {
    let mut out = String::new();
    for article in articles {
        out.push_str(&article_block(article));
    }
    out
}

fn article_block(article: &Article) -> String {
    let mut block = String::new();
    block.push_str(&format!("Title: {}\n", article.title));
    block.push_str(&format!("Source: {}\n", article.source_name));
    block.push_str(&format!("Author: {}\n", article.author));
    block.push_str(&format!("Publication Date: {}\n", article.published_at));
    block.push_str(&format!(
        "Content: {}...\n",
        truncate_chars(&article.content, PREVIEW_LEN)
    ));
    block.push_str(&"-".repeat(SEPARATOR_LEN));
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Article {
        Article {
            title: "Big News".to_string(),
            url: Some("https://example.com/big".to_string()),
            source_name: "The Wire".to_string(),
            author: "Jane Smith".to_string(),
            published_at: "17th May, 2025".to_string(),
            content: "x".repeat(300),
        }
    }

    #[test]
    fn test_block_contains_all_fields() {
        let rendered = article_blocks(&[sample()]);
        assert!(rendered.contains("Title: Big News"));
        assert!(rendered.contains("Source: The Wire"));
        assert!(rendered.contains("Author: Jane Smith"));
        assert!(rendered.contains("Publication Date: 17th May, 2025"));
        assert!(rendered.contains(&"-".repeat(50)));
    }

    #[test]
    fn test_preview_is_capped() {
        let rendered = article_blocks(&[sample()]);
        let preview_line = rendered
            .lines()
            .find(|l| l.starts_with("Content: "))
            .unwrap();
        assert!(preview_line.contains(&"x".repeat(100)));
        assert!(!preview_line.contains(&"x".repeat(101)));
        assert!(preview_line.ends_with("..."));
    }

    #[test]
    fn test_empty_collection_renders_empty() {
        assert_eq!(article_blocks(&[]), "");
    }
}
