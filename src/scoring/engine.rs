//! Weighted score aggregation.
//!
//! Both entry points are pure: the full input is validated before anything
//! is summed, so a call either produces a complete result or fails with
//! [`AssessmentError::InvalidInput`].
//!
//! Normalized values use integer round-half-up: `100 * total / max` is
//! rounded to the nearest whole number and exact halves round up. A zero
//! denominator normalizes to 0.

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{
    CategorizedScore, CategoryBreakdown, CategoryScore, WeightedScore, MAX_SCORE, MIN_SCORE,
};

/// Overall aggregate of a score set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallScore {
    /// Sum of `score * weight`.
    pub total_score: i64,
    /// Sum of `5 * weight`.
    pub max_possible: i64,
    /// `total_score` as a 0-100 percentage of `max_possible`.
    pub normalized_score: u8,
}

/// Compute the total and normalized score over a non-empty score set.
pub fn compute_overall<S: WeightedScore>(scores: &[S]) -> AssessmentResult<OverallScore> {
    if scores.is_empty() {
        return Err(AssessmentError::InvalidInput(
            "cannot aggregate an empty score set".to_string(),
        ));
    }
    validate_all(scores)?;

    let mut total_score = 0i64;
    let mut max_possible = 0i64;
    for (index, s) in scores.iter().enumerate() {
        let (weighted, max) = weighted_pair(index, s)?;
        total_score = checked_sum(total_score, weighted)?;
        max_possible = checked_sum(max_possible, max)?;
    }

    Ok(OverallScore {
        total_score,
        max_possible,
        normalized_score: normalize(total_score, max_possible),
    })
}

/// Group scores by category and compute each category's rollup.
///
/// Categories appear in the order they are first seen in `scores`.
pub fn compute_category_breakdown<S: CategorizedScore>(
    scores: &[S],
) -> AssessmentResult<CategoryBreakdown> {
    validate_all(scores)?;

    let mut breakdown = CategoryBreakdown::new();
    for (index, s) in scores.iter().enumerate() {
        let (weighted, max) = weighted_pair(index, s)?;
        let entry = breakdown
            .entry(s.category().to_string())
            .or_insert_with(CategoryScore::default);
        entry.total = checked_sum(entry.total, weighted)?;
        entry.max = checked_sum(entry.max, max)?;
    }

    for entry in breakdown.values_mut() {
        entry.normalized = normalize(entry.total, entry.max);
    }

    Ok(breakdown)
}

/// Express `total` as a rounded percentage of `max`, clamped to 0..=100.
pub fn normalize(total: i64, max: i64) -> u8 {
    if max <= 0 {
        return 0;
    }
    let total = total.clamp(0, max) as i128;
    let max = max as i128;
    // round(100 * total / max) with halves rounding up
    let rounded = (200 * total + max) / (2 * max);
    rounded.clamp(0, 100) as u8
}

/// `score * weight` and `MAX_SCORE * weight` for one entry.
fn weighted_pair<S: WeightedScore>(index: usize, s: &S) -> AssessmentResult<(i64, i64)> {
    let weighted = i64::from(s.score()).checked_mul(s.weight());
    let max = i64::from(MAX_SCORE).checked_mul(s.weight());
    match (weighted, max) {
        (Some(weighted), Some(max)) => Ok((weighted, max)),
        _ => Err(AssessmentError::InvalidInput(format!(
            "weight at position {} is too large ({})",
            index,
            s.weight()
        ))),
    }
}

fn checked_sum(acc: i64, value: i64) -> AssessmentResult<i64> {
    acc.checked_add(value).ok_or_else(|| {
        AssessmentError::InvalidInput("weighted score total is out of range".to_string())
    })
}

fn validate_all<S: WeightedScore>(scores: &[S]) -> AssessmentResult<()> {
    for (index, s) in scores.iter().enumerate() {
        if !(MIN_SCORE..=MAX_SCORE).contains(&s.score()) {
            return Err(AssessmentError::InvalidInput(format!(
                "score at position {} is {}, expected {}-{}",
                index,
                s.score(),
                MIN_SCORE,
                MAX_SCORE
            )));
        }
        if s.weight() < 0 {
            return Err(AssessmentError::InvalidInput(format!(
                "weight at position {} is negative ({})",
                index,
                s.weight()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionScore;

    fn score(category: &str, score: u8, weight: i64) -> DimensionScore {
        DimensionScore::new(format!("{}-{}-{}", category, score, weight), category, score, weight)
    }

    #[test]
    fn test_worked_example() {
        let scores = vec![score("A", 5, 10), score("A", 1, 10), score("B", 3, 20)];

        let overall = compute_overall(&scores).unwrap();
        assert_eq!(overall.total_score, 120);
        assert_eq!(overall.max_possible, 200);
        assert_eq!(overall.normalized_score, 60);

        let breakdown = compute_category_breakdown(&scores).unwrap();
        assert_eq!(
            breakdown["A"],
            CategoryScore {
                total: 60,
                max: 100,
                normalized: 60
            }
        );
        assert_eq!(
            breakdown["B"],
            CategoryScore {
                total: 60,
                max: 100,
                normalized: 60
            }
        );
    }

    #[test]
    fn test_all_fives_and_all_ones() {
        for weights in [vec![1], vec![10, 5, 3], vec![7, 7, 7, 7, 2], vec![0, 4]] {
            let fives: Vec<_> = weights.iter().map(|w| score("X", 5, *w)).collect();
            let ones: Vec<_> = weights.iter().map(|w| score("X", 1, *w)).collect();
            assert_eq!(compute_overall(&fives).unwrap().normalized_score, 100);
            assert_eq!(compute_overall(&ones).unwrap().normalized_score, 20);
        }
    }

    #[test]
    fn test_normalized_stays_in_range() {
        for s in 1..=5u8 {
            for w in 0..=12i64 {
                let scores = vec![score("A", s, w), score("B", 6 - s, w + 3)];
                let overall = compute_overall(&scores).unwrap();
                assert!(overall.normalized_score <= 100);
                assert!(overall.normalized_score >= 20 || overall.max_possible == 0);
            }
        }
    }

    #[test]
    fn test_category_totals_sum_to_overall() {
        let scores = vec![
            score("Strategic", 4, 10),
            score("Technical", 2, 8),
            score("Strategic", 3, 6),
            score("Risk", 5, 9),
            score("Technical", 1, 4),
        ];

        let overall = compute_overall(&scores).unwrap();
        let breakdown = compute_category_breakdown(&scores).unwrap();

        let total: i64 = breakdown.values().map(|c| c.total).sum();
        let max: i64 = breakdown.values().map(|c| c.max).sum();
        assert_eq!(total, overall.total_score);
        assert_eq!(max, overall.max_possible);
    }

    #[test]
    fn test_breakdown_preserves_first_seen_order() {
        let scores = vec![score("Zeta", 3, 1), score("Alpha", 3, 1), score("Zeta", 4, 1)];
        let breakdown = compute_category_breakdown(&scores).unwrap();
        let keys: Vec<&str> = breakdown.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let scores = vec![score("A", 2, 3), score("B", 4, 7)];
        assert_eq!(compute_overall(&scores), compute_overall(&scores));
        assert_eq!(
            compute_category_breakdown(&scores),
            compute_category_breakdown(&scores)
        );
    }

    #[test]
    fn test_rejects_out_of_range_scores() {
        let scores = vec![score("A", 3, 1), score("A", 6, 1)];
        assert!(matches!(
            compute_overall(&scores),
            Err(AssessmentError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_category_breakdown(&scores),
            Err(AssessmentError::InvalidInput(_))
        ));

        let zero = vec![score("A", 0, 1)];
        assert!(compute_overall(&zero).is_err());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let scores = vec![score("A", 3, 5), score("B", 3, -1)];
        assert!(matches!(
            compute_overall(&scores),
            Err(AssessmentError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_oversized_weights_are_rejected() {
        let huge = vec![score("A", 5, i64::MAX / 4)];
        assert!(matches!(
            compute_overall(&huge),
            Err(AssessmentError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_category_breakdown(&huge),
            Err(AssessmentError::InvalidInput(_))
        ));

        // Each product fits, but the sum does not.
        let summed = vec![score("A", 1, i64::MAX / 5), score("A", 1, i64::MAX / 5)];
        assert!(compute_overall(&summed).is_err());
        assert!(compute_category_breakdown(&summed).is_err());
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<DimensionScore> = Vec::new();
        assert!(compute_overall(&empty).is_err());
        assert!(compute_category_breakdown(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_zero_weight_normalizes_to_zero() {
        let scores = vec![score("A", 4, 0)];
        let overall = compute_overall(&scores).unwrap();
        assert_eq!(overall.max_possible, 0);
        assert_eq!(overall.normalized_score, 0);
        assert_eq!(compute_category_breakdown(&scores).unwrap()["A"].normalized, 0);
    }

    #[test]
    fn test_normalize_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(normalize(1, 8), 13);
        // 3/8 = 37.5%
        assert_eq!(normalize(3, 8), 38);
        // 1/3 = 33.33%
        assert_eq!(normalize(1, 3), 33);
        // 2/3 = 66.67%
        assert_eq!(normalize(2, 3), 67);
        assert_eq!(normalize(5, 0), 0);
    }
}
