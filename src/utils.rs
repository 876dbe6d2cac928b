//! String helpers shared across the pipeline.
//!
//! Scraped pages and API payloads arrive with arbitrary whitespace and
//! arbitrary length; these helpers keep truncation character-safe and
//! log output readable.

/// Truncate a string to at most `max` characters, respecting char boundaries.
///
/// Scraped article text is capped for display and storage; slicing by bytes
/// would panic on multi-byte UTF-8, so this walks characters.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("hello", 3), "hel");
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// HTML text nodes come back with newlines and indentation baked in; the
/// display form wants a single flowing string.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to roughly `max` bytes with an ellipsis and
/// byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…(+{} bytes)", &s[..end], s.len() - end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_string() {
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn test_truncate_chars_caps_length() {
        let s = "a".repeat(700);
        assert_eq!(truncate_chars(&s, 500).len(), 500);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Must not split the é
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_collapse_ws() {
        assert_eq!(collapse_ws("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_ws(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }
}
