//! Horizontal bar chart for the source distribution.
//!
//! A terminal stand-in for a plotting library: one row per source, bar
//! lengths scaled so the largest count fills the full width, counts
//! labeled at the end of each bar.

use crate::models::Distribution;

const BAR_WIDTH: usize = 40;

/// Render the distribution as an aligned ASCII bar chart, one source per
/// line in source-name order. Empty distributions render as an empty string.
pub fn distribution_chart(distribution: &Distribution) -> String {
    let max_count = distribution.values().copied().max().unwrap_or(0);
    if max_count == 0 {
        return String::new();
    }
    let label_width = distribution.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    let mut out = String::from("Articles by source\n");
    for (source, count) in distribution {
        let bar_len = (count * BAR_WIDTH).div_ceil(max_count);
        out.push_str(&format!(
            "{source:<label_width$}  {} {count}\n",
            "█".repeat(bar_len)
        ));
    }
    out
}
