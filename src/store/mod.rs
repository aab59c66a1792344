//! Assessment record store.
//!
//! A store persists use cases, their per-dimension scores, and their
//! computed summary. A use case exclusively owns its scores and at most one
//! summary; deleting it removes both. Replacing an assessment swaps scores
//! and summary together, so readers never observe a mix of old and new.

pub mod memory;
pub mod sqlite;

#[allow(unused_imports)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{AssessmentSummary, DimensionScore, NewUseCase, UseCase, UseCaseKey};
use std::collections::HashSet;

/// Storage abstraction so the assessment workflow can run against any backend.
pub trait AssessmentStore: Send + Sync {
    /// Create a draft use case. Fails with `DuplicateId` if the identifier exists.
    fn create_use_case(&self, new: NewUseCase) -> AssessmentResult<UseCaseKey>;

    fn get_use_case(&self, key: UseCaseKey) -> AssessmentResult<Option<UseCase>>;

    /// All use cases, newest created first.
    fn list_use_cases(&self) -> AssessmentResult<Vec<UseCase>>;

    /// Remove a use case with its scores and summary. Unknown keys are a no-op.
    fn delete_use_case(&self, key: UseCaseKey) -> AssessmentResult<()>;

    /// Replace the full score set and summary, marking the use case completed.
    ///
    /// Fails with `InvalidInput` if a dimension appears more than once.
    fn replace_assessment(
        &self,
        key: UseCaseKey,
        scores: Vec<DimensionScore>,
        summary: AssessmentSummary,
    ) -> AssessmentResult<()>;

    /// Stored scores in insertion order; empty when none are stored.
    fn get_scores(&self, key: UseCaseKey) -> AssessmentResult<Vec<DimensionScore>>;

    fn get_summary(&self, key: UseCaseKey) -> AssessmentResult<Option<AssessmentSummary>>;
}

/// A use case holds at most one score per dimension.
fn ensure_unique_dimensions(scores: &[DimensionScore]) -> AssessmentResult<()> {
    let mut seen = HashSet::new();
    match scores.iter().find(|s| !seen.insert(s.dimension.as_str())) {
        Some(dup) => Err(AssessmentError::InvalidInput(format!(
            "dimension '{}' is scored more than once",
            dup.dimension
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every store implementation must satisfy.

    use super::*;
    use crate::models::{CategoryBreakdown, CategoryScore, UseCaseStatus};
    use chrono::Utc;

    pub(crate) fn summary(total: i64, normalized: u8) -> AssessmentSummary {
        let mut category_scores = CategoryBreakdown::new();
        category_scores.insert(
            "Strategic".to_string(),
            CategoryScore {
                total,
                max: 100,
                normalized,
            },
        );
        AssessmentSummary {
            total_score: total,
            normalized_score: normalized,
            category_scores,
            ai_insights: "insight".to_string(),
            recommendations: vec!["first".to_string(), "second".to_string()],
            created_at: Utc::now(),
        }
    }

    pub(crate) fn create_and_get(store: &dyn AssessmentStore) {
        let mut new = NewUseCase::new("UC-001", "Invoice triage");
        new.description = Some("Route invoices".to_string());
        new.business_unit = "Finance".to_string();
        let key = store.create_use_case(new).unwrap();

        let uc = store.get_use_case(key).unwrap().unwrap();
        assert_eq!(uc.use_case_id, "UC-001");
        assert_eq!(uc.name, "Invoice triage");
        assert_eq!(uc.description.as_deref(), Some("Route invoices"));
        assert_eq!(uc.business_unit, "Finance");
        assert_eq!(uc.status, UseCaseStatus::Draft);

        assert!(store.get_use_case(UseCaseKey(9999)).unwrap().is_none());
    }

    pub(crate) fn duplicate_id_rejected(store: &dyn AssessmentStore) {
        store.create_use_case(NewUseCase::new("UC-1", "First")).unwrap();
        let err = store
            .create_use_case(NewUseCase::new("UC-1", "Second"))
            .unwrap_err();
        assert_eq!(err, AssessmentError::DuplicateId("UC-1".to_string()));
        assert_eq!(store.list_use_cases().unwrap().len(), 1);
    }

    pub(crate) fn list_newest_first(store: &dyn AssessmentStore) {
        let a = store.create_use_case(NewUseCase::new("A", "a")).unwrap();
        let b = store.create_use_case(NewUseCase::new("B", "b")).unwrap();
        let c = store.create_use_case(NewUseCase::new("C", "c")).unwrap();

        let keys: Vec<UseCaseKey> = store
            .list_use_cases()
            .unwrap()
            .iter()
            .map(|u| u.key)
            .collect();
        assert_eq!(keys, vec![c, b, a]);
    }

    pub(crate) fn replace_overwrites_wholesale(store: &dyn AssessmentStore) {
        let key = store.create_use_case(NewUseCase::new("UC-R", "Replace")).unwrap();

        let first = vec![
            DimensionScore::new("Impact", "Strategic", 5, 10),
            DimensionScore::new("Data", "Technical", 2, 8),
        ];
        store
            .replace_assessment(key, first, summary(66, 66))
            .unwrap();
        assert_eq!(
            store.get_use_case(key).unwrap().unwrap().status,
            UseCaseStatus::Completed
        );

        let second = vec![DimensionScore::new("Impact", "Strategic", 3, 10)];
        store
            .replace_assessment(key, second.clone(), summary(30, 60))
            .unwrap();

        let scores = store.get_scores(key).unwrap();
        assert_eq!(scores, second);
        assert!(scores.iter().all(|s| s.dimension != "Data"));

        let stored = store.get_summary(key).unwrap().unwrap();
        assert_eq!(stored.total_score, 30);
        assert_eq!(stored.normalized_score, 60);
        assert_eq!(stored.recommendations, vec!["first", "second"]);
        assert_eq!(stored.category_scores["Strategic"].total, 30);
    }

    pub(crate) fn replace_unknown_use_case(store: &dyn AssessmentStore) {
        let result = store.replace_assessment(
            UseCaseKey(404),
            vec![DimensionScore::new("Impact", "Strategic", 3, 10)],
            summary(30, 60),
        );
        assert!(matches!(result, Err(AssessmentError::NotFound(_))));
        assert!(store.get_summary(UseCaseKey(404)).unwrap().is_none());
    }

    pub(crate) fn duplicate_dimension_rejected(store: &dyn AssessmentStore) {
        let key = store
            .create_use_case(NewUseCase::new("UC-F", "Duplicated"))
            .unwrap();
        store
            .replace_assessment(
                key,
                vec![DimensionScore::new("Impact", "Strategic", 4, 10)],
                summary(40, 80),
            )
            .unwrap();

        let duplicated = vec![
            DimensionScore::new("Impact", "Strategic", 2, 10),
            DimensionScore::new("Impact", "Strategic", 3, 10),
        ];
        assert!(matches!(
            store.replace_assessment(key, duplicated, summary(50, 50)),
            Err(AssessmentError::InvalidInput(_))
        ));

        let scores = store.get_scores(key).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 4);
        assert_eq!(store.get_summary(key).unwrap().unwrap().total_score, 40);
    }

    pub(crate) fn delete_cascades(store: &dyn AssessmentStore) {
        let key = store.create_use_case(NewUseCase::new("UC-D", "Delete")).unwrap();
        let other = store.create_use_case(NewUseCase::new("UC-K", "Keep")).unwrap();
        for k in [key, other] {
            store
                .replace_assessment(
                    k,
                    vec![DimensionScore::new("Impact", "Strategic", 4, 10)],
                    summary(40, 80),
                )
                .unwrap();
        }

        store.delete_use_case(key).unwrap();
        assert!(store.get_use_case(key).unwrap().is_none());
        assert!(store.get_scores(key).unwrap().is_empty());
        assert!(store.get_summary(key).unwrap().is_none());

        // Deleting again is a no-op.
        store.delete_use_case(key).unwrap();

        assert_eq!(store.get_scores(other).unwrap().len(), 1);
        assert!(store.get_summary(other).unwrap().is_some());
    }
}
