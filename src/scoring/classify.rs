//! Strength/challenge classification and readiness bands.

use crate::models::DimensionScore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw score at or above which a dimension counts as a strength.
pub const STRENGTH_THRESHOLD: u8 = 4;

/// Raw score at or below which a dimension counts as a challenge.
pub const CHALLENGE_THRESHOLD: u8 = 2;

/// Default length of the strengths/challenges lists.
pub const DEFAULT_TOP_N: usize = 5;

/// Readiness band for a normalized score.
///
/// Bands are half-open with inclusive lower bounds: 80, 60 and 40 belong to
/// Excellent, Good and Moderate respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessBand {
    Challenging,
    Moderate,
    Good,
    Excellent,
}

impl ReadinessBand {
    pub fn from_score(normalized: u8) -> Self {
        match normalized {
            80.. => ReadinessBand::Excellent,
            60..=79 => ReadinessBand::Good,
            40..=59 => ReadinessBand::Moderate,
            _ => ReadinessBand::Challenging,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "Excellent",
            ReadinessBand::Good => "Good",
            ReadinessBand::Moderate => "Moderate",
            ReadinessBand::Challenging => "Challenging",
        }
    }

    /// Longer interpretation used in reports.
    pub fn interpretation(&self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "Ready for Implementation",
            ReadinessBand::Good => "Minor Improvements Needed",
            ReadinessBand::Moderate => "Significant Planning Required",
            ReadinessBand::Challenging => "Major Obstacles to Address",
        }
    }

    /// Display colour as a hex code.
    pub fn color(&self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "#4caf50",
            ReadinessBand::Good => "#2196f3",
            ReadinessBand::Moderate => "#ff9800",
            ReadinessBand::Challenging => "#f44336",
        }
    }

    /// Returns an emoji representation of the band.
    pub fn emoji(&self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "🟢",
            ReadinessBand::Good => "🔵",
            ReadinessBand::Moderate => "🟠",
            ReadinessBand::Challenging => "🔴",
        }
    }
}

impl fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Dimensions scored at or above [`STRENGTH_THRESHOLD`], highest first.
///
/// Ties keep the input order, which callers supply in catalog order.
pub fn strengths(scores: &[DimensionScore], limit: usize) -> Vec<&DimensionScore> {
    let mut found: Vec<&DimensionScore> = scores
        .iter()
        .filter(|s| s.score >= STRENGTH_THRESHOLD)
        .collect();
    // sort_by is stable
    found.sort_by(|a, b| b.score.cmp(&a.score));
    found.truncate(limit);
    found
}

/// Dimensions scored at or below [`CHALLENGE_THRESHOLD`], lowest first.
///
/// Ties keep the input order, which callers supply in catalog order.
pub fn challenges(scores: &[DimensionScore], limit: usize) -> Vec<&DimensionScore> {
    let mut found: Vec<&DimensionScore> = scores
        .iter()
        .filter(|s| s.score <= CHALLENGE_THRESHOLD)
        .collect();
    found.sort_by_key(|s| s.score);
    found.truncate(limit);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(name: &str, score: u8) -> DimensionScore {
        DimensionScore::new(name, "Cat", score, 1)
    }

    #[test]
    fn test_band_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(ReadinessBand::from_score(100), ReadinessBand::Excellent);
        assert_eq!(ReadinessBand::from_score(80), ReadinessBand::Excellent);
        assert_eq!(ReadinessBand::from_score(79), ReadinessBand::Good);
        assert_eq!(ReadinessBand::from_score(60), ReadinessBand::Good);
        assert_eq!(ReadinessBand::from_score(59), ReadinessBand::Moderate);
        assert_eq!(ReadinessBand::from_score(40), ReadinessBand::Moderate);
        assert_eq!(ReadinessBand::from_score(39), ReadinessBand::Challenging);
        assert_eq!(ReadinessBand::from_score(0), ReadinessBand::Challenging);
    }

    #[test]
    fn test_band_presentation() {
        let band = ReadinessBand::from_score(85);
        assert_eq!(band.to_string(), "Excellent");
        assert_eq!(band.color(), "#4caf50");
        assert_eq!(
            ReadinessBand::Moderate.interpretation(),
            "Significant Planning Required"
        );
    }

    #[test]
    fn test_strengths_order_and_ties() {
        let scores = vec![
            dim("a", 4),
            dim("b", 5),
            dim("c", 3),
            dim("d", 4),
            dim("e", 5),
        ];

        let names: Vec<&str> = strengths(&scores, 5)
            .iter()
            .map(|s| s.dimension.as_str())
            .collect();
        assert_eq!(names, vec!["b", "e", "a", "d"]);
    }

    #[test]
    fn test_challenges_order_and_ties() {
        let scores = vec![dim("a", 2), dim("b", 1), dim("c", 3), dim("d", 2), dim("e", 1)];

        let names: Vec<&str> = challenges(&scores, 5)
            .iter()
            .map(|s| s.dimension.as_str())
            .collect();
        assert_eq!(names, vec!["b", "e", "a", "d"]);
    }

    #[test]
    fn test_top_n_limit() {
        let scores: Vec<_> = (0..8).map(|i| dim(&format!("d{}", i), 5)).collect();
        let top = strengths(&scores, DEFAULT_TOP_N);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].dimension, "d0");
        assert_eq!(top[4].dimension, "d4");
        assert!(challenges(&scores, DEFAULT_TOP_N).is_empty());
    }
}
