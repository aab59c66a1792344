//! In-memory record store.
//!
//! All tables sit behind one lock, so every operation (including cascade
//! delete and assessment replacement) is applied atomically.

use super::AssessmentStore;
use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{
    AssessmentSummary, DimensionScore, NewUseCase, UseCase, UseCaseKey, UseCaseStatus,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    next_key: i64,
    use_cases: BTreeMap<UseCaseKey, UseCase>,
    scores: BTreeMap<UseCaseKey, Vec<DimensionScore>>,
    summaries: BTreeMap<UseCaseKey, AssessmentSummary>,
}

/// Store that keeps everything in process memory.
#[allow(dead_code)] // Used by tests and embedding callers
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AssessmentResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AssessmentError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AssessmentResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AssessmentError::Storage("memory store lock poisoned".to_string()))
    }
}

impl AssessmentStore for MemoryStore {
    fn create_use_case(&self, new: NewUseCase) -> AssessmentResult<UseCaseKey> {
        let mut tables = self.write()?;

        if tables
            .use_cases
            .values()
            .any(|uc| uc.use_case_id == new.use_case_id)
        {
            return Err(AssessmentError::DuplicateId(new.use_case_id));
        }

        tables.next_key += 1;
        let key = UseCaseKey(tables.next_key);
        let now = Utc::now();
        tables.use_cases.insert(
            key,
            UseCase {
                key,
                use_case_id: new.use_case_id,
                name: new.name,
                description: new.description,
                business_unit: new.business_unit,
                process_owner: new.process_owner,
                status: UseCaseStatus::Draft,
                created_at: now,
                updated_at: now,
            },
        );

        debug!("Created use case {}", key);
        Ok(key)
    }

    fn get_use_case(&self, key: UseCaseKey) -> AssessmentResult<Option<UseCase>> {
        Ok(self.read()?.use_cases.get(&key).cloned())
    }

    fn list_use_cases(&self) -> AssessmentResult<Vec<UseCase>> {
        let mut all: Vec<UseCase> = self.read()?.use_cases.values().cloned().collect();
        // Keys grow monotonically, so they break timestamp ties in creation order.
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.key.cmp(&a.key)));
        Ok(all)
    }

    fn delete_use_case(&self, key: UseCaseKey) -> AssessmentResult<()> {
        let mut tables = self.write()?;
        tables.scores.remove(&key);
        tables.summaries.remove(&key);
        if tables.use_cases.remove(&key).is_some() {
            debug!("Deleted use case {}", key);
        }
        Ok(())
    }

    fn replace_assessment(
        &self,
        key: UseCaseKey,
        scores: Vec<DimensionScore>,
        summary: AssessmentSummary,
    ) -> AssessmentResult<()> {
        super::ensure_unique_dimensions(&scores)?;
        let mut tables = self.write()?;

        let use_case = tables
            .use_cases
            .get_mut(&key)
            .ok_or_else(|| AssessmentError::NotFound(format!("use case {}", key)))?;
        use_case.status = UseCaseStatus::Completed;
        use_case.updated_at = Utc::now();

        tables.scores.insert(key, scores);
        tables.summaries.insert(key, summary);
        Ok(())
    }

    fn get_scores(&self, key: UseCaseKey) -> AssessmentResult<Vec<DimensionScore>> {
        Ok(self.read()?.scores.get(&key).cloned().unwrap_or_default())
    }

    fn get_summary(&self, key: UseCaseKey) -> AssessmentResult<Option<AssessmentSummary>> {
        Ok(self.read()?.summaries.get(&key).cloned())
    }
}
