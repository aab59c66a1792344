//! SQLite record store.
//!
//! Three tables mirror the record model. Foreign keys cascade from
//! `use_cases`, and every multi-statement operation runs in a single
//! transaction so a failure leaves no orphaned rows.

use super::AssessmentStore;
use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{
    AssessmentSummary, CategoryBreakdown, DimensionScore, NewUseCase, UseCase, UseCaseKey,
    UseCaseStatus,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS use_cases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    use_case_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT,
    business_unit TEXT NOT NULL DEFAULT '',
    process_owner TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assessment_scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    use_case_id INTEGER NOT NULL,
    dimension TEXT NOT NULL,
    category TEXT NOT NULL,
    score INTEGER NOT NULL,
    weight INTEGER NOT NULL,
    weighted_score INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (use_case_id, dimension),
    FOREIGN KEY (use_case_id) REFERENCES use_cases(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS assessment_summaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    use_case_id INTEGER NOT NULL UNIQUE,
    total_score INTEGER NOT NULL,
    normalized_score INTEGER NOT NULL,
    category_scores TEXT NOT NULL,
    ai_insights TEXT,
    recommendations TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (use_case_id) REFERENCES use_cases(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_scores_use_case ON assessment_scores(use_case_id);
"#;

/// Store backed by a SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> AssessmentResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AssessmentError::Storage(format!(
                        "cannot create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        info!("Opened assessment database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    #[allow(dead_code)] // Used by tests and embedding callers
    pub fn open_in_memory() -> AssessmentResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AssessmentResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AssessmentResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AssessmentError::Storage("database connection lock poisoned".to_string()))
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    // Fixed-width so that text ordering matches time ordering.
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn parse_status(column: usize, raw: &str) -> rusqlite::Result<UseCaseStatus> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })
}

fn use_case_from_row(row: &Row<'_>) -> rusqlite::Result<UseCase> {
    let status: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(UseCase {
        key: UseCaseKey(row.get(0)?),
        use_case_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        business_unit: row.get(4)?,
        process_owner: row.get(5)?,
        status: parse_status(6, &status)?,
        created_at: parse_timestamp(7, &created_at)?,
        updated_at: parse_timestamp(8, &updated_at)?,
    })
}

const USE_CASE_COLUMNS: &str = "id, use_case_id, name, description, business_unit, \
                                process_owner, status, created_at, updated_at";

impl AssessmentStore for SqliteStore {
    fn create_use_case(&self, new: NewUseCase) -> AssessmentResult<UseCaseKey> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM use_cases WHERE use_case_id = ?1",
                params![&new.use_case_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(AssessmentError::DuplicateId(new.use_case_id));
        }

        let now = timestamp(Utc::now());
        let inserted = tx.execute(
            "INSERT INTO use_cases (use_case_id, name, description, business_unit,
                                    process_owner, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                &new.use_case_id,
                &new.name,
                &new.description,
                &new.business_unit,
                &new.process_owner,
                UseCaseStatus::Draft.as_str(),
                &now
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                return Err(AssessmentError::DuplicateId(new.use_case_id));
            }
            Err(e) => return Err(e.into()),
        }

        let key = UseCaseKey(tx.last_insert_rowid());
        tx.commit()?;

        debug!("Created use case {} ({})", key, new.use_case_id);
        Ok(key)
    }

    fn get_use_case(&self, key: UseCaseKey) -> AssessmentResult<Option<UseCase>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM use_cases WHERE id = ?1", USE_CASE_COLUMNS);
        let use_case = conn
            .query_row(&sql, params![key.0], use_case_from_row)
            .optional()?;
        Ok(use_case)
    }

    fn list_use_cases(&self) -> AssessmentResult<Vec<UseCase>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM use_cases ORDER BY created_at DESC, id DESC",
            USE_CASE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], use_case_from_row)?;
        let use_cases = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(use_cases)
    }

    fn delete_use_case(&self, key: UseCaseKey) -> AssessmentResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM assessment_scores WHERE use_case_id = ?1",
            params![key.0],
        )?;
        tx.execute(
            "DELETE FROM assessment_summaries WHERE use_case_id = ?1",
            params![key.0],
        )?;
        let removed = tx.execute("DELETE FROM use_cases WHERE id = ?1", params![key.0])?;
        tx.commit()?;

        if removed > 0 {
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
        let category_scores = serde_json::to_string(&summary.category_scores)?;
        let recommendations = serde_json::to_string(&summary.recommendations)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM use_cases WHERE id = ?1",
                params![key.0],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(AssessmentError::NotFound(format!("use case {}", key)));
        }

        let now = timestamp(Utc::now());

        tx.execute(
            "DELETE FROM assessment_scores WHERE use_case_id = ?1",
            params![key.0],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO assessment_scores
                 (use_case_id, dimension, category, score, weight, weighted_score, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for score in &scores {
                insert.execute(params![
                    key.0,
                    &score.dimension,
                    &score.category,
                    score.score,
                    score.weight,
                    score.weighted_score,
                    &now
                ])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO assessment_summaries
             (use_case_id, total_score, normalized_score, category_scores,
              ai_insights, recommendations, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                key.0,
                summary.total_score,
                summary.normalized_score,
                &category_scores,
                &summary.ai_insights,
                &recommendations,
                timestamp(summary.created_at)
            ],
        )?;

        tx.execute(
            "UPDATE use_cases SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![UseCaseStatus::Completed.as_str(), &now, key.0],
        )?;

        tx.commit()?;
        debug!("Saved assessment for use case {} ({} scores)", key, scores.len());
        Ok(())
    }

    fn get_scores(&self, key: UseCaseKey) -> AssessmentResult<Vec<DimensionScore>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT dimension, category, score, weight, weighted_score
             FROM assessment_scores WHERE use_case_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![key.0], |row| {
            Ok(DimensionScore {
                dimension: row.get(0)?,
                category: row.get(1)?,
                score: row.get(2)?,
                weight: row.get(3)?,
                weighted_score: row.get(4)?,
            })
        })?;
        let scores = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(scores)
    }

    fn get_summary(&self, key: UseCaseKey) -> AssessmentResult<Option<AssessmentSummary>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT total_score, normalized_score, category_scores, ai_insights,
                        recommendations, created_at
                 FROM assessment_summaries WHERE use_case_id = ?1",
                params![key.0],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, u8>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((total_score, normalized_score, category_json, insights, recs_json, created_at)) =
            row
        else {
            return Ok(None);
        };

        let category_scores: CategoryBreakdown = serde_json::from_str(&category_json)?;
        let recommendations: Vec<String> = match recs_json.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
            _ => Vec::new(),
        };

        Ok(Some(AssessmentSummary {
            total_score,
            normalized_score,
            category_scores,
            ai_insights: insights.unwrap_or_default(),
            recommendations,
            created_at: parse_timestamp(5, &created_at)?,
        }))
    }
}
