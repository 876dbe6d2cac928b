//! Last-resort author and date extraction from unstructured article text.
//!
//! Most pages lack usable meta tags, so the pipeline falls back to scanning
//! the article body itself. Both extractors are pure and independent; a miss
//! returns `None` and the caller leaves the field as `"Unknown"`.
//!
//! # Known weakness
//!
//! The author scan stops at the first capitalized word that is glued to the
//! previous character without whitespace. That boundary is what keeps a
//! run-on byline like `ByJaneSmithMay 17, 2025` from swallowing the date,
//! but it also truncates hyphenated and camel-cased surnames (`Jean-Luc`
//! stops at `Jean`, `McDonald` at `Mc`). Downstream display and tests depend
//! on this exact boundary, so it is kept as-is rather than widened.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `Month Day, Year` with a full English month name.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2}),\s*(\d{4})",
    )
    .unwrap()
});

/// Extract an author name from a `By <Name>` byline marker.
///
/// The scan finds a token beginning with the literal `By`, takes the first
/// capitalized word after it (whitespace between `By` and the name is
/// optional), then appends further capitalized words only while each is
/// separated from the previous character by whitespace. Internal whitespace
/// is collapsed to single spaces.
///
/// Returns `None` when no byline is found.
pub fn extract_author(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();

    let mut i = 0;
    while i + 1 < n {
        let at_boundary = i == 0 || chars[i - 1].is_whitespace();
        if at_boundary && chars[i] == 'B' && chars[i + 1] == 'y' {
            let mut j = i + 2;
            while j < n && chars[j].is_whitespace() {
                j += 1;
            }
            if j < n && chars[j].is_uppercase() {
                return Some(scan_name(&chars, j));
            }
        }
        i += 1;
    }
    None
}

/// Grow a name word-by-word starting at an uppercase char.
fn scan_name(chars: &[char], mut i: usize) -> String {
    let n = chars.len();
    let mut name = String::new();

    loop {
        // one capitalized word: uppercase head, lowercase alphabetic tail
        name.push(chars[i]);
        i += 1;
        while i < n && chars[i].is_alphabetic() && chars[i].is_lowercase() {
            name.push(chars[i]);
            i += 1;
        }

        // append the next word only if whitespace separates it
        let mut j = i;
        while j < n && chars[j].is_whitespace() {
            j += 1;
        }
        if j > i && j < n && chars[j].is_uppercase() {
            name.push(' ');
            i = j;
        } else {
            break;
        }
    }
    name
}

/// Extract a `Month Day, Year` date from article text, rendered in ordinal
/// display form (`"17th May, 2025"`).
///
/// When the matched text fails to parse as a real calendar date (e.g.
/// `February 30, 2025`) the raw matched text is returned unparsed rather
/// than discarded.
pub fn extract_date(text: &str) -> Option<String> {
    let caps = DATE_RE.captures(text)?;
    let raw = caps.get(0).unwrap().as_str();

    match NaiveDate::parse_from_str(raw, "%B %d, %Y") {
        Ok(date) => Some(format_ordinal_date(date)),
        Err(_) => Some(raw.to_string()),
    }
}

/// Render a date as `"17th May, 2025"`.
pub fn format_ordinal_date(date: NaiveDate) -> String {
    format!(
        "{}{} {}, {}",
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%B"),
        date.year()
    )
}

/// Ordinal suffix for a day of the month. Days 11 through 20 always take
/// `"th"`; otherwise the suffix follows the final digit.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Reformat an ISO-8601 timestamp into the ordinal display form.
///
/// Returns `None` when the value does not parse, in which case the caller
/// passes the raw value through verbatim.
pub fn display_date_from_iso(raw: &str) -> Option<String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(format_ordinal_date(dt.date_naive()));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(format_ordinal_date(dt.date()));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(format_ordinal_date(d));
    }
    None
}
