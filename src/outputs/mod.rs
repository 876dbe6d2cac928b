//! Rendering and persistence of aggregated articles.
//!
//! This is the thin presentation boundary over the pipeline: the articles
//! render as separated text blocks, the source distribution renders as a
//! horizontal bar chart, and the full collection can be written out as JSON
//! for other consumers.

pub mod chart;
pub mod json;
pub mod text;
