//! Dimension catalog loading and lookup.
//!
//! The catalog is an ordered list of dimensions loaded once from a JSON
//! document. Catalog order is the canonical display and iteration order,
//! and categories are derived from it in first-seen order.

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::{Dimension, MAX_SCORE, MAX_WEIGHT, MIN_SCORE};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read-only, validated list of evaluation dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCatalog {
    dimensions: Vec<Dimension>,
}

impl DimensionCatalog {
    /// Build a catalog from dimensions, validating its invariants.
    pub fn new(dimensions: Vec<Dimension>) -> AssessmentResult<Self> {
        if dimensions.is_empty() {
            return Err(AssessmentError::InvalidInput(
                "catalog must contain at least one dimension".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for dim in &dimensions {
            if dim.name.trim().is_empty() {
                return Err(AssessmentError::InvalidInput(
                    "dimension name must not be empty".to_string(),
                ));
            }
            if !seen.insert(dim.name.as_str()) {
                return Err(AssessmentError::InvalidInput(format!(
                    "duplicate dimension name: {}",
                    dim.name
                )));
            }
            if dim.default_weight < 0 {
                return Err(AssessmentError::InvalidInput(format!(
                    "dimension '{}' has negative weight {}",
                    dim.name, dim.default_weight
                )));
            }
            if dim.default_weight > MAX_WEIGHT {
                return Err(AssessmentError::InvalidInput(format!(
                    "dimension '{}' has weight {}, maximum is {}",
                    dim.name, dim.default_weight, MAX_WEIGHT
                )));
            }
            if let Some(missing) =
                (MIN_SCORE..=MAX_SCORE).find(|s| !dim.score_descriptions.contains_key(s))
            {
                return Err(AssessmentError::InvalidInput(format!(
                    "dimension '{}' has no description for score {}",
                    dim.name, missing
                )));
            }
        }

        Ok(Self { dimensions })
    }

    /// Parse and validate a JSON catalog document.
    pub fn from_json(json: &str) -> AssessmentResult<Self> {
        let dimensions: Vec<Dimension> = serde_json::from_str(json)
            .map_err(|e| AssessmentError::InvalidInput(format!("catalog document: {}", e)))?;
        Self::new(dimensions)
    }

    /// Load the catalog from `path`, falling back to the built-in catalog
    /// when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_builtin(path: &Path) -> AssessmentResult<Self> {
        if !path.exists() {
            warn!(
                "Catalog not found at {}, using built-in catalog",
                path.display()
            );
            return Ok(Self::builtin());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AssessmentError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded {} dimensions in {} categories from {}",
            catalog.len(),
            catalog.categories().len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Minimal catalog used when no document is available.
    pub fn builtin() -> Self {
        let score_descriptions: BTreeMap<u8, String> = [
            (1, "Minimal impact (<$100K annual value)"),
            (2, "Low impact ($100K-$500K)"),
            (3, "Moderate impact ($500K-$2M)"),
            (4, "High impact ($2M-$10M)"),
            (5, "Transformational (>$10M or strategic differentiator)"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();

        debug!("Building built-in catalog");
        Self {
            dimensions: vec![Dimension {
                category: "Strategic & Business".to_string(),
                name: "Business Impact & Value".to_string(),
                default_weight: 10,
                description: "Potential revenue increase, cost savings, customer satisfaction \
                              improvement, competitive advantage"
                    .to_string(),
                score_descriptions,
            }],
        }
    }

    /// All dimensions in catalog order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.dimensions
            .iter()
            .map(|d| d.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Dimensions belonging to `category`, in catalog order.
    pub fn dimensions_in<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Dimension> {
        self.dimensions.iter().filter(move |d| d.category == category)
    }

    /// Look up a dimension by name.
    pub fn get(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }
}
