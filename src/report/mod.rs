//! Report generation and export.

pub mod export;
pub mod generator;

pub use export::{default_export_path, generate_csv, generate_json, write_export};
pub use generator::generate_markdown_report;

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{AssessmentSummary, DimensionScore, UseCase, UseCaseKey, UseCaseStatus};
use crate::store::AssessmentStore;
use serde::Serialize;

/// A use case together with its saved assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub use_case: UseCase,
    pub summary: AssessmentSummary,
    pub scores: Vec<DimensionScore>,
}

impl AssessmentReport {
    /// Load a completed assessment; `NotFound` if the use case or its summary is missing.
    pub fn load(store: &dyn AssessmentStore, key: UseCaseKey) -> AssessmentResult<Self> {
        let use_case = store
            .get_use_case(key)?
            .ok_or_else(|| AssessmentError::NotFound(format!("use case {}", key)))?;
        let summary = store.get_summary(key)?.ok_or_else(|| {
            AssessmentError::NotFound(format!(
                "no assessment results for use case {}",
                use_case.use_case_id
            ))
        })?;
        let scores = store.get_scores(key)?;

        Ok(Self {
            use_case,
            summary,
            scores,
        })
    }
}

/// Portfolio-level figures across all use cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_use_cases: usize,
    pub completed_assessments: usize,
    /// Mean normalized score of completed assessments, if any.
    pub average_score: Option<f64>,
}

impl DashboardStats {
    pub fn collect(store: &dyn AssessmentStore) -> AssessmentResult<Self> {
        let use_cases = store.list_use_cases()?;

        let mut completed = 0;
        let mut score_sum = 0u64;
        let mut scored = 0u64;
        for uc in use_cases
            .iter()
            .filter(|uc| uc.status == UseCaseStatus::Completed)
        {
            completed += 1;
            if let Some(summary) = store.get_summary(uc.key)? {
                score_sum += u64::from(summary.normalized_score);
                scored += 1;
            }
        }

        Ok(Self {
            total_use_cases: use_cases.len(),
            completed_assessments: completed,
            average_score: (scored > 0).then(|| score_sum as f64 / scored as f64),
        })
    }
}
