//! Deterministic rule-based insights.
//!
//! Used directly when no remote generator is configured, and as the
//! fallback whenever the remote generator fails.

use super::{InsightRequest, Insights};
use crate::models::CategoryBreakdown;
use crate::scoring::ReadinessBand;

/// Number of weakest categories named in the narrative.
const WEAK_CATEGORY_COUNT: usize = 2;

/// Template-driven insight generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInsights;

impl RuleBasedInsights {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, request: &InsightRequest<'_>) -> Insights {
        let band = ReadinessBand::from_score(request.normalized_score);
        let weak = weakest_categories(request, WEAK_CATEGORY_COUNT);

        let focus = if weak.is_empty() {
            "the assessed dimensions".to_string()
        } else {
            weak.join(" and ")
        };

        let text = format!(
            "{} The assessment reveals {} readiness with particular focus needed on {}.",
            band_statement(band),
            band.label().to_lowercase(),
            focus
        );

        let weakest = weak.first().copied().unwrap_or("the lowest-scoring");
        let recommendations = vec![
            format!(
                "Focus on improving {} dimensions through targeted initiatives \
                 and resource allocation.",
                weakest
            ),
            "Conduct a detailed risk assessment and develop mitigation strategies \
             for low-scoring areas."
                .to_string(),
            "Engage stakeholders early to build support and address organizational \
             readiness concerns."
                .to_string(),
        ];

        Insights {
            text,
            recommendations,
        }
    }
}

/// The `count` lowest-normalized categories.
///
/// The breakdown is in catalog category order and the sort is stable, so
/// ties resolve to the category that comes first in the catalog.
fn weakest_categories<'a>(request: &InsightRequest<'a>, count: usize) -> Vec<&'a str> {
    let scores: &'a CategoryBreakdown = request.category_scores;
    let mut categories: Vec<(&str, u8)> = scores
        .iter()
        .map(|(name, score)| (name.as_str(), score.normalized))
        .collect();
    categories.sort_by_key(|(_, normalized)| *normalized);
    categories
        .into_iter()
        .take(count)
        .map(|(name, _)| name)
        .collect()
}

fn band_statement(band: ReadinessBand) -> &'static str {
    match band {
        ReadinessBand::Excellent => {
            "This use case demonstrates strong readiness across most dimensions \
             and is well-positioned for implementation."
        }
        ReadinessBand::Good => {
            "This use case shows good potential with some areas requiring attention \
             before full implementation."
        }
        ReadinessBand::Moderate => {
            "This use case has moderate readiness with several significant challenges \
             that need to be addressed."
        }
        ReadinessBand::Challenging => {
            "This use case faces substantial obstacles and requires significant \
             planning and risk mitigation."
        }
    }
}
