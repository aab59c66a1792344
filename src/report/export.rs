//! Tabular and document exports of an assessment.

use super::AssessmentReport;
use crate::models::DimensionScore;
use crate::scoring::ReadinessBand;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One CSV row per scored dimension.
#[derive(Debug, Serialize)]
struct ScoreRow<'a> {
    dimension: &'a str,
    category: &'a str,
    score: u8,
    weight: i64,
    weighted_score: i64,
}

impl<'a> From<&'a DimensionScore> for ScoreRow<'a> {
    fn from(s: &'a DimensionScore) -> Self {
        Self {
            dimension: &s.dimension,
            category: &s.category,
            score: s.score,
            weight: s.weight,
            weighted_score: s.weighted_score,
        }
    }
}

/// Render the dimension scores as CSV with a header row.
pub fn generate_csv(scores: &[DimensionScore]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for score in scores {
        writer
            .serialize(ScoreRow::from(score))
            .context("Failed to serialize score row")?;
    }
    if scores.is_empty() {
        writer.write_record([
            "dimension",
            "category",
            "score",
            "weight",
            "weighted_score",
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// JSON document: the report plus its readiness band.
#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    #[serde(flatten)]
    report: &'a AssessmentReport,
    readiness: Readiness,
}

#[derive(Debug, Serialize)]
struct Readiness {
    label: &'static str,
    interpretation: &'static str,
    color: &'static str,
}

/// Render use case, summary, scores, and readiness as pretty-printed JSON.
pub fn generate_json(report: &AssessmentReport) -> Result<String> {
    let band = ReadinessBand::from_score(report.summary.normalized_score);
    let export = JsonExport {
        report,
        readiness: Readiness {
            label: band.label(),
            interpretation: band.interpretation(),
            color: band.color(),
        },
    };
    serde_json::to_string_pretty(&export).context("Failed to serialize report")
}

/// Default export file name for a use case, e.g. `assessment_UC-7.csv`.
pub fn default_export_path(use_case_id: &str, extension: &str) -> PathBuf {
    let safe: String = use_case_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    PathBuf::from(format!("assessment_{}.{}", safe, extension))
}

/// Write export content to `path`.
pub fn write_export(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write export to {}", path.display()))
}
