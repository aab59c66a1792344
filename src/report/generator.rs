//! Markdown report generation.
//!
//! This module renders a complete assessment (use case, summary, and
//! dimension scores) as a Markdown document.

use super::AssessmentReport;
use crate::models::{AssessmentSummary, DimensionScore, UseCase};
use crate::scoring::{challenges, strengths, ReadinessBand};

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AssessmentReport, top_n: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "# Assessment: {} - {}\n\n",
        report.use_case.use_case_id, report.use_case.name
    ));

    output.push_str(&generate_use_case_section(&report.use_case));
    output.push_str(&generate_score_section(&report.summary));
    output.push_str(&generate_category_section(&report.summary));
    output.push_str(&generate_strengths_section(&report.scores, top_n));
    output.push_str(&generate_insights_section(&report.summary.ai_insights));
    output.push_str(&generate_recommendations_section(
        &report.summary.recommendations,
    ));
    output.push_str(&generate_dimension_table(&report.scores));
    output.push_str(&generate_footer(&report.summary));

    output
}

fn generate_use_case_section(use_case: &UseCase) -> String {
    let mut section = String::new();

    section.push_str("## Use Case\n\n");
    if let Some(ref description) = use_case.description {
        if !description.is_empty() {
            section.push_str(&format!("*{}*\n\n", description));
        }
    }
    if !use_case.business_unit.is_empty() {
        section.push_str(&format!("- **Business Unit:** {}\n", use_case.business_unit));
    }
    if !use_case.process_owner.is_empty() {
        section.push_str(&format!("- **Process Owner:** {}\n", use_case.process_owner));
    }
    section.push_str(&format!("- **Status:** {}\n", use_case.status));
    section.push_str(&format!(
        "- **Created:** {}\n\n",
        use_case.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

fn generate_score_section(summary: &AssessmentSummary) -> String {
    let band = ReadinessBand::from_score(summary.normalized_score);
    let mut section = String::new();

    section.push_str("## Overall Score\n\n");
    section.push_str(&format!(
        "**{}/100** {} {} - {}\n\n",
        summary.normalized_score,
        band.emoji(),
        band.label(),
        band.interpretation()
    ));
    section.push_str(&format!("- **Total Weighted Score:** {}\n\n", summary.total_score));

    section
}

fn generate_category_section(summary: &AssessmentSummary) -> String {
    if summary.category_scores.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Category Scores\n\n");
    section.push_str("| Category | Score | Weighted | Max | Status |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---|\n");

    for (category, score) in &summary.category_scores {
        let band = ReadinessBand::from_score(score.normalized);
        section.push_str(&format!(
            "| {} | {}/100 | {} | {} | {} {} |\n",
            category,
            score.normalized,
            score.total,
            score.max,
            band.emoji(),
            band.label()
        ));
    }
    section.push('\n');

    section
}

fn generate_strengths_section(scores: &[DimensionScore], top_n: usize) -> String {
    let mut section = String::new();

    section.push_str("## Strengths & Challenges\n\n");

    section.push_str("### Top Strengths\n\n");
    let top = strengths(scores, top_n);
    if top.is_empty() {
        section.push_str("No dimensions scored 4 or higher.\n\n");
    } else {
        for s in top {
            section.push_str(&format!(
                "- **{}** ({}) - {}/5\n",
                s.dimension, s.category, s.score
            ));
        }
        section.push('\n');
    }

    section.push_str("### Key Challenges\n\n");
    let low = challenges(scores, top_n);
    if low.is_empty() {
        section.push_str("No dimensions scored 2 or lower.\n\n");
    } else {
        for s in low {
            section.push_str(&format!(
                "- **{}** ({}) - {}/5\n",
                s.dimension, s.category, s.score
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_insights_section(insights: &str) -> String {
    if insights.is_empty() {
        return String::new();
    }

    format!("## Insights\n\n{}\n\n", insights)
}

fn generate_recommendations_section(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Recommendations\n\n");
    for (i, rec) in recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

fn generate_dimension_table(scores: &[DimensionScore]) -> String {
    let mut section = String::new();

    section.push_str("## All Dimension Scores\n\n");
    section.push_str("| Dimension | Category | Score (1-5) | Weight | Weighted Score |\n");
    section.push_str("|:---|:---|:---:|:---:|:---:|\n");
    for s in scores {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            s.dimension, s.category, s.score, s.weight, s.weighted_score
        ));
    }
    section.push('\n');

    section
}

fn generate_footer(summary: &AssessmentSummary) -> String {
    format!(
        "---\n\n*Assessed {}*\n",
        summary.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_generate_markdown_report() {
        let report = sample_report();
        let markdown = generate_markdown_report(&report, 5);

        assert!(markdown.contains("# Assessment: UC-7 - Claims intake"));
        assert!(markdown.contains("**60/100**"));
        assert!(markdown.contains("Good - Minor Improvements Needed"));
        assert!(markdown.contains("## Category Scores"));
        assert!(markdown.contains("| A | 60/100 | 60 | 100 |"));
        assert!(markdown.contains("- **Upside** (A) - 5/5"));
        assert!(markdown.contains("- **Downside** (A) - 1/5"));
        assert!(markdown.contains("1. Pilot in one region"));
        assert!(markdown.contains("| Feasibility | B | 3 | 20 | 60 |"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        assert!(generate_insights_section("").is_empty());
        assert!(generate_recommendations_section(&[]).is_empty());

        let section = generate_strengths_section(&[DimensionScore::new("Mid", "A", 3, 1)], 5);
        assert!(section.contains("No dimensions scored 4 or higher."));
        assert!(section.contains("No dimensions scored 2 or lower."));
    }
}
