//! Scoring and aggregation.
//!
//! Pure functions over scored dimensions: weighted totals, category
//! rollups, normalization, and strength/challenge classification.

pub mod classify;
pub mod engine;

pub use classify::{challenges, strengths, ReadinessBand, DEFAULT_TOP_N};
pub use engine::{compute_category_breakdown, compute_overall};
