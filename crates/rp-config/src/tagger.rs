//! Outlier tagger settings.

use rp_common::Feature;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Isolation-forest parameters for the outlier tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct TaggerConfig {
    /// Numeric columns scored jointly.
    pub features: Vec<Feature>,
    /// Target share of scored rows flagged, in (0, 0.5].
    pub contamination: f64,
    /// Number of isolation trees.
    pub n_estimators: usize,
    /// Sub-sample drawn for each tree (capped at the row count).
    pub max_samples: usize,
    /// Seed for tree construction.
    pub seed: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            features: vec![Feature::Revenue],
            contamination: 0.05,
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

impl TaggerConfig {
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
