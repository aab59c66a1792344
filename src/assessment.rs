//! Assessment drafts and submission.
//!
//! An [`AssessmentDraft`] is the caller-held session for one use case: the
//! raw scores collected so far. [`Assessor::submit`] turns a complete draft
//! into stored scores and a summary.

use crate::catalog::DimensionCatalog;
use crate::error::{AssessmentError, AssessmentResult};
use crate::insights::{InsightRequest, InsightService};
use crate::models::{AssessmentSummary, DimensionScore, UseCaseKey, MAX_SCORE, MIN_SCORE};
use crate::scoring::{compute_category_breakdown, compute_overall};
use crate::store::AssessmentStore;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};

/// In-progress raw scores for one use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDraft {
    key: UseCaseKey,
    scores: HashMap<String, u8>,
}

impl AssessmentDraft {
    pub fn new(key: UseCaseKey) -> Self {
        Self {
            key,
            scores: HashMap::new(),
        }
    }

    /// Seed a draft from previously stored scores, e.g. to revise an assessment.
    pub fn from_stored(key: UseCaseKey, stored: &[DimensionScore]) -> Self {
        Self {
            key,
            scores: stored
                .iter()
                .map(|s| (s.dimension.clone(), s.score))
                .collect(),
        }
    }

    pub fn key(&self) -> UseCaseKey {
        self.key
    }

    /// Record a raw score for a catalog dimension, replacing any earlier one.
    pub fn set_score(
        &mut self,
        catalog: &DimensionCatalog,
        dimension: &str,
        score: u8,
    ) -> AssessmentResult<()> {
        if catalog.get(dimension).is_none() {
            return Err(AssessmentError::InvalidInput(format!(
                "unknown dimension: {}",
                dimension
            )));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(AssessmentError::InvalidInput(format!(
                "score for '{}' is {}, expected {}-{}",
                dimension, score, MIN_SCORE, MAX_SCORE
            )));
        }
        self.scores.insert(dimension.to_string(), score);
        Ok(())
    }

    pub fn score(&self, dimension: &str) -> Option<u8> {
        self.scores.get(dimension).copied()
    }

    /// Number of catalog dimensions scored, and the catalog size.
    pub fn progress(&self, catalog: &DimensionCatalog) -> (usize, usize) {
        let scored = catalog
            .dimensions()
            .iter()
            .filter(|d| self.scores.contains_key(&d.name))
            .count();
        (scored, catalog.len())
    }

    pub fn is_complete(&self, catalog: &DimensionCatalog) -> bool {
        let (scored, total) = self.progress(catalog);
        scored == total
    }

    /// Catalog dimensions that still need a score, in catalog order.
    pub fn missing<'a>(&self, catalog: &'a DimensionCatalog) -> Vec<&'a str> {
        catalog
            .dimensions()
            .iter()
            .filter(|d| !self.scores.contains_key(&d.name))
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Build the score records in catalog order, copying category and
    /// weight from the catalog.
    pub fn to_scores(&self, catalog: &DimensionCatalog) -> AssessmentResult<Vec<DimensionScore>> {
        let missing = self.missing(catalog);
        if !missing.is_empty() {
            return Err(AssessmentError::InvalidInput(format!(
                "assessment incomplete, missing: {}",
                missing.join(", ")
            )));
        }

        if let Some(unknown) = self.scores.keys().find(|name| catalog.get(name).is_none()) {
            return Err(AssessmentError::InvalidInput(format!(
                "unknown dimension: {}",
                unknown
            )));
        }

        Ok(catalog
            .dimensions()
            .iter()
            .filter_map(|d| {
                self.scores.get(&d.name).map(|score| {
                    DimensionScore::new(&d.name, &d.category, *score, d.default_weight)
                })
            })
            .collect())
    }
}

/// Runs the assessment workflow against a store and insight service.
pub struct Assessor<'a> {
    catalog: &'a DimensionCatalog,
    store: &'a dyn AssessmentStore,
    insights: &'a InsightService,
    top_n: usize,
}

impl<'a> Assessor<'a> {
    pub fn new(
        catalog: &'a DimensionCatalog,
        store: &'a dyn AssessmentStore,
        insights: &'a InsightService,
        top_n: usize,
    ) -> Self {
        Self {
            catalog,
            store,
            insights,
            top_n,
        }
    }

    /// Score a complete draft, generate insights, and replace the stored assessment.
    pub async fn submit(&self, draft: &AssessmentDraft) -> AssessmentResult<AssessmentSummary> {
        let use_case = self
            .store
            .get_use_case(draft.key())?
            .ok_or_else(|| AssessmentError::NotFound(format!("use case {}", draft.key())))?;

        let scores = draft.to_scores(self.catalog)?;
        let overall = compute_overall(&scores)?;
        let category_scores = compute_category_breakdown(&scores)?;
        debug!(
            "Use case {} scored {}/{} ({}/100)",
            use_case.use_case_id,
            overall.total_score,
            overall.max_possible,
            overall.normalized_score
        );

        let request = InsightRequest {
            use_case: &use_case,
            scores: &scores,
            normalized_score: overall.normalized_score,
            category_scores: &category_scores,
            top_n: self.top_n,
        };
        let insights = self.insights.generate(&request).await;

        let summary = AssessmentSummary {
            total_score: overall.total_score,
            normalized_score: overall.normalized_score,
            category_scores,
            ai_insights: insights.text,
            recommendations: insights.recommendations,
            created_at: Utc::now(),
        };

        self.store
            .replace_assessment(use_case.key, scores, summary.clone())?;
        info!(
            "Saved assessment for {} ({}/100)",
            use_case.use_case_id, summary.normalized_score
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimension, NewUseCase, UseCaseStatus};
    use crate::store::MemoryStore;

    fn catalog() -> DimensionCatalog {
        let dim = |category: &str, name: &str, weight: i64| Dimension {
            category: category.to_string(),
            name: name.to_string(),
            default_weight: weight,
            description: String::new(),
            score_descriptions: (1..=5).map(|s| (s, format!("level {}", s))).collect(),
        };
        DimensionCatalog::new(vec![
            dim("A", "Upside", 10),
            dim("A", "Downside", 10),
            dim("B", "Feasibility", 20),
        ])
        .unwrap()
    }

    #[test]
    fn test_draft_progress_and_validation() {
        let catalog = catalog();
        let mut draft = AssessmentDraft::new(UseCaseKey(1));

        assert_eq!(draft.progress(&catalog), (0, 3));
        draft.set_score(&catalog, "Upside", 5).unwrap();
        assert_eq!(draft.progress(&catalog), (1, 3));
        assert!(!draft.is_complete(&catalog));
        assert_eq!(draft.missing(&catalog), vec!["Downside", "Feasibility"]);

        assert!(draft.set_score(&catalog, "Upside", 0).is_err());
        assert!(draft.set_score(&catalog, "Upside", 6).is_err());
        assert!(draft.set_score(&catalog, "Nope", 3).is_err());
        assert_eq!(draft.score("Upside"), Some(5));
    }

    #[test]
    fn test_incomplete_draft_is_rejected() {
        let catalog = catalog();
        let mut draft = AssessmentDraft::new(UseCaseKey(1));
        draft.set_score(&catalog, "Upside", 5).unwrap();

        let err = draft.to_scores(&catalog).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::InvalidInput(
                "assessment incomplete, missing: Downside, Feasibility".to_string()
            )
        );
    }

    #[test]
    fn test_scores_follow_catalog_order_and_copy_weights() {
        let catalog = catalog();
        let mut draft = AssessmentDraft::new(UseCaseKey(1));
        draft.set_score(&catalog, "Feasibility", 3).unwrap();
        draft.set_score(&catalog, "Downside", 1).unwrap();
        draft.set_score(&catalog, "Upside", 5).unwrap();

        let scores = draft.to_scores(&catalog).unwrap();
        assert_eq!(
            scores,
            vec![
                DimensionScore::new("Upside", "A", 5, 10),
                DimensionScore::new("Downside", "A", 1, 10),
                DimensionScore::new("Feasibility", "B", 3, 20),
            ]
        );
    }

    #[test]
    fn test_draft_from_stored_scores() {
        let stored = vec![DimensionScore::new("Upside", "A", 4, 10)];
        let draft = AssessmentDraft::from_stored(UseCaseKey(7), &stored);
        assert_eq!(draft.key(), UseCaseKey(7));
        assert_eq!(draft.score("Upside"), Some(4));
    }

    #[tokio::test]
    async fn test_submit_stores_scores_and_summary() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let insights = InsightService::rules_only();
        let assessor = Assessor::new(&catalog, &store, &insights, 5);

        let key = store
            .create_use_case(NewUseCase::new("UC-1", "Claims intake"))
            .unwrap();
        let mut draft = AssessmentDraft::new(key);
        draft.set_score(&catalog, "Upside", 5).unwrap();
        draft.set_score(&catalog, "Downside", 1).unwrap();
        draft.set_score(&catalog, "Feasibility", 3).unwrap();

        let summary = assessor.submit(&draft).await.unwrap();
        assert_eq!(summary.total_score, 120);
        assert_eq!(summary.normalized_score, 60);
        assert_eq!(summary.category_scores["A"].normalized, 60);
        assert_eq!(summary.category_scores["B"].normalized, 60);
        assert_eq!(summary.recommendations.len(), 3);
        assert!(summary.recommendations[0].contains(" A "));

        assert_eq!(store.get_scores(key).unwrap().len(), 3);
        assert_eq!(store.get_summary(key).unwrap(), Some(summary));
        assert_eq!(
            store.get_use_case(key).unwrap().unwrap().status,
            UseCaseStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_submit_unknown_use_case() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let insights = InsightService::rules_only();
        let assessor = Assessor::new(&catalog, &store, &insights, 5);

        let draft = AssessmentDraft::new(UseCaseKey(99));
        assert!(matches!(
            assessor.submit(&draft).await,
            Err(AssessmentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_incomplete_submit_leaves_use_case_draft() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let insights = InsightService::rules_only();
        let assessor = Assessor::new(&catalog, &store, &insights, 5);

        let key = store
            .create_use_case(NewUseCase::new("UC-2", "Partial"))
            .unwrap();
        let mut draft = AssessmentDraft::new(key);
        draft.set_score(&catalog, "Upside", 4).unwrap();

        assert!(assessor.submit(&draft).await.is_err());
        assert_eq!(
            store.get_use_case(key).unwrap().unwrap().status,
            UseCaseStatus::Draft
        );
        assert!(store.get_summary(key).unwrap().is_none());
    }
}
