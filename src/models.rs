//! Data models for the assessment tool.
//!
//! This module contains the core data structures shared by the catalog,
//! scoring engine, record store, and report generation.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lowest valid raw score.
pub const MIN_SCORE: u8 = 1;

/// Highest valid raw score.
pub const MAX_SCORE: u8 = 5;

/// Largest weight a catalog dimension may carry.
pub const MAX_WEIGHT: i64 = 1_000_000;

/// A single evaluation axis from the dimension catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Category used for rollup reporting.
    pub category: String,
    /// Unique dimension name.
    #[serde(alias = "dimension")]
    pub name: String,
    /// Relative importance multiplier.
    pub default_weight: i64,
    /// Free-text explanation of what is being rated.
    #[serde(default)]
    pub description: String,
    /// Descriptive text for each raw score 1 through 5.
    #[serde(alias = "scores")]
    pub score_descriptions: BTreeMap<u8, String>,
}

impl Dimension {
    /// Returns the description for a raw score, if the catalog provides one.
    pub fn describe(&self, score: u8) -> Option<&str> {
        self.score_descriptions.get(&score).map(String::as_str)
    }
}

/// Opaque store key for a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UseCaseKey(pub i64);

impl fmt::Display for UseCaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UseCaseKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UseCaseKey)
    }
}

/// Lifecycle status of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCaseStatus {
    /// Created, not yet fully assessed.
    Draft,
    /// A full assessment has been saved.
    Completed,
}

impl UseCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCaseStatus::Draft => "draft",
            UseCaseStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for UseCaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseCaseStatus::Draft => write!(f, "Draft"),
            UseCaseStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for UseCaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(UseCaseStatus::Draft),
            "completed" => Ok(UseCaseStatus::Completed),
            other => Err(format!("unknown use case status: {}", other)),
        }
    }
}

/// Fields supplied when creating a use case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUseCase {
    /// Externally supplied identifier, unique across the store.
    pub use_case_id: String,
    pub name: String,
    pub description: Option<String>,
    pub business_unit: String,
    pub process_owner: String,
}

impl NewUseCase {
    pub fn new(use_case_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            use_case_id: use_case_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The subject being assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    /// Store key.
    pub key: UseCaseKey,
    /// Externally supplied identifier, immutable after creation.
    pub use_case_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub business_unit: String,
    pub process_owner: String,
    pub status: UseCaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Access to the fields the scoring engine needs from a scored record.
pub trait WeightedScore {
    /// Raw score, expected in 1..=5.
    fn score(&self) -> u8;
    /// Weight applied to the raw score, expected non-negative.
    fn weight(&self) -> i64;
}

/// A weighted score tagged with its rollup category.
pub trait CategorizedScore: WeightedScore {
    fn category(&self) -> &str;
}

/// Raw score for one dimension of one use case.
///
/// `category` and `weight` are copied from the catalog when the assessment
/// is built, so aggregation never needs the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: String,
    pub category: String,
    pub score: u8,
    pub weight: i64,
    pub weighted_score: i64,
}

impl DimensionScore {
    pub fn new(
        dimension: impl Into<String>,
        category: impl Into<String>,
        score: u8,
        weight: i64,
    ) -> Self {
        Self {
            dimension: dimension.into(),
            category: category.into(),
            score,
            weight,
            // Saturates; the scoring engine rejects weights this large.
            weighted_score: i64::from(score).saturating_mul(weight),
        }
    }
}

impl WeightedScore for DimensionScore {
    fn score(&self) -> u8 {
        self.score
    }

    fn weight(&self) -> i64 {
        self.weight
    }
}

impl CategorizedScore for DimensionScore {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Rollup of all scores within one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Sum of weighted scores.
    pub total: i64,
    /// Sum of the maximum possible weighted scores.
    pub max: i64,
    /// `total` as a 0-100 percentage of `max`.
    pub normalized: u8,
}

/// Category rollups keyed by category, in first-seen order.
pub type CategoryBreakdown = IndexMap<String, CategoryScore>;

/// Computed result of a saved assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub total_score: i64,
    pub normalized_score: u8,
    pub category_scores: CategoryBreakdown,
    #[serde(default)]
    pub ai_insights: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score_is_derived() {
        let score = DimensionScore::new("Business Impact", "Strategic", 4, 10);
        assert_eq!(score.weighted_score, 40);
    }

    #[test]
    fn test_status_round_trip_text() {
        assert_eq!("completed".parse::<UseCaseStatus>(), Ok(UseCaseStatus::Completed));
        assert_eq!("Draft".parse::<UseCaseStatus>(), Ok(UseCaseStatus::Draft));
        assert!("archived".parse::<UseCaseStatus>().is_err());
        assert_eq!(UseCaseStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_dimension_accepts_legacy_keys() {
        let json = r#"{
            "category": "Strategic & Business",
            "dimension": "Business Impact & Value",
            "default_weight": 10,
            "description": "Potential value",
            "scores": {
                "1": "Minimal", "2": "Low", "3": "Moderate", "4": "High",
                "5": "Transformational"
            }
        }"#;

        let dim: Dimension = serde_json::from_str(json).unwrap();
        assert_eq!(dim.name, "Business Impact & Value");
        assert_eq!(dim.describe(5), Some("Transformational"));
        assert_eq!(dim.describe(6), None);
    }

    #[test]
    fn test_use_case_key_parse() {
        assert_eq!("42".parse::<UseCaseKey>(), Ok(UseCaseKey(42)));
        assert!("abc".parse::<UseCaseKey>().is_err());
    }
}
