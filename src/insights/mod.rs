//! Narrative insights and recommendations for an assessment.
//!
//! [`InsightService`] is total: a configured remote generator is tried
//! first under a timeout, and any failure falls back to the deterministic
//! [`RuleBasedInsights`]. Thin remote output (empty text or no
//! recommendations) is accepted as is.

pub mod ollama;
pub mod rules;

pub use ollama::{OllamaConfig, OllamaInsights};
pub use rules::RuleBasedInsights;

use crate::error::ProviderError;
use crate::models::{CategoryBreakdown, DimensionScore, UseCase};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Generated narrative and ordered recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub text: String,
    pub recommendations: Vec<String>,
}

/// Everything a generator may draw on for one assessment.
#[derive(Debug, Clone, Copy)]
pub struct InsightRequest<'a> {
    pub use_case: &'a UseCase,
    /// Scores in catalog order.
    pub scores: &'a [DimensionScore],
    pub normalized_score: u8,
    pub category_scores: &'a CategoryBreakdown,
    /// Length of the strengths/challenges lists given to remote generators.
    pub top_n: usize,
}

/// A generator that may fail, such as a call to an external model.
#[async_trait]
pub trait RemoteInsights: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: &InsightRequest<'_>) -> Result<Insights, ProviderError>;
}

/// Where an [`Insights`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightOrigin {
    Remote,
    Fallback,
}

/// Insight generation with a guaranteed rule-based fallback.
pub struct InsightService {
    remote: Option<Box<dyn RemoteInsights>>,
    fallback: RuleBasedInsights,
    timeout: Duration,
}

impl InsightService {
    /// Service that only uses the rule-based generator.
    pub fn rules_only() -> Self {
        Self {
            remote: None,
            fallback: RuleBasedInsights::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Service that tries `remote` first, bounded by `timeout`.
    pub fn with_remote(remote: Box<dyn RemoteInsights>, timeout: Duration) -> Self {
        Self {
            remote: Some(remote),
            fallback: RuleBasedInsights::new(),
            timeout,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn generate(&self, request: &InsightRequest<'_>) -> Insights {
        self.generate_with_origin(request).await.0
    }

    /// Generate insights and report whether the remote generator produced them.
    pub async fn generate_with_origin(
        &self,
        request: &InsightRequest<'_>,
    ) -> (Insights, InsightOrigin) {
        match self.try_remote(request).await {
            Ok(insights) => {
                debug!(
                    "Remote insights received ({} recommendations)",
                    insights.recommendations.len()
                );
                (insights, InsightOrigin::Remote)
            }
            Err(ProviderError::Disabled) => {
                (self.fallback.generate(request), InsightOrigin::Fallback)
            }
            Err(e) => {
                warn!("Insight generation failed, using rule-based insights: {}", e);
                (self.fallback.generate(request), InsightOrigin::Fallback)
            }
        }
    }

    async fn try_remote(&self, request: &InsightRequest<'_>) -> Result<Insights, ProviderError> {
        let remote = self.remote.as_ref().ok_or(ProviderError::Disabled)?;
        debug!("Requesting insights from {}", remote.name());

        tokio::time::timeout(self.timeout, remote.generate(request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))?
    }
}
