//! Outlier tagger.
//!
//! Fits a fresh isolation forest on whatever rows it is handed and flags the
//! top `contamination` share by anomaly score. Flags are relative to the
//! scored set: the same row can flip when the set changes.

pub mod forest;

use rp_common::{Feature, Row};
use rp_config::{validate_tagger, TaggerConfig};
use rp_math::quantile;
use serde::Serialize;
use thiserror::Error;

pub use forest::{IsolationForest, IsolationTree};

/// Tagger failures.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("no features selected for scoring")]
    NoFeatures,

    #[error("row {row}: feature '{feature}' is not a finite number")]
    NonFiniteFeature { row: usize, feature: Feature },

    #[error("invalid tagger config: {0}")]
    InvalidConfig(String),
}

impl From<TaggerError> for rp_common::Error {
    fn from(err: TaggerError) -> Self {
        match err {
            TaggerError::NonFiniteFeature { row, feature } => rp_common::Error::NonFiniteFeature {
                row,
                feature: feature.as_str().to_string(),
            },
            TaggerError::NoFeatures => rp_common::Error::Tagging(err.to_string()),
            TaggerError::InvalidConfig(msg) => rp_common::Error::InvalidConfig(msg),
        }
    }
}

pub type TaggerResult<T> = std::result::Result<T, TaggerError>;

/// Scores and decisions for one scored set.
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    pub scores: Vec<f64>,
    /// Score a row must strictly exceed to be flagged. `None` for an empty set.
    pub threshold: Option<f64>,
    pub flags: Vec<bool>,
}

impl TagReport {
    pub fn flagged(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn scored(&self) -> usize {
        self.flags.len()
    }
}

/// Isolation-forest outlier tagger.
#[derive(Debug, Clone)]
pub struct OutlierTagger {
    config: TaggerConfig,
}

impl OutlierTagger {
    pub fn new(config: TaggerConfig) -> TaggerResult<Self> {
        if config.features.is_empty() {
            return Err(TaggerError::NoFeatures);
        }
        validate_tagger(&config).map_err(|e| TaggerError::InvalidConfig(e.to_string()))?;
        Ok(OutlierTagger { config })
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// Anomaly score per row, in (0, 1].
    pub fn score(&self, rows: &[Row]) -> TaggerResult<Vec<f64>> {
        let points = self.feature_matrix(rows)?;
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let forest = IsolationForest::fit(
            &points,
            self.config.n_estimators,
            self.config.max_samples,
            self.config.seed,
        );
        Ok(forest.score_all(&points))
    }

    /// Scores, threshold and flags for `rows`.
    pub fn evaluate(&self, rows: &[Row]) -> TaggerResult<TagReport> {
        let scores = self.score(rows)?;
        let threshold = if scores.is_empty() {
            None
        } else {
            Some(quantile(&scores, 1.0 - self.config.contamination))
        };
        let flags = match threshold {
            Some(t) => scores.iter().map(|&s| s > t).collect(),
            None => Vec::new(),
        };
        Ok(TagReport {
            scores,
            threshold,
            flags,
        })
    }

    /// One outlier decision per row, in input order.
    pub fn flag(&self, rows: &[Row]) -> TaggerResult<Vec<bool>> {
        Ok(self.evaluate(rows)?.flags)
    }

    /// Set `anomaly_flag` on every row. No other field changes.
    pub fn tag(&self, mut rows: Vec<Row>) -> TaggerResult<Vec<Row>> {
        let flags = self.flag(&rows)?;
        for (row, flag) in rows.iter_mut().zip(flags) {
            row.anomaly_flag = Some(flag);
        }
        Ok(rows)
    }

    fn feature_matrix(&self, rows: &[Row]) -> TaggerResult<Vec<Vec<f64>>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| {
                self.config
                    .features
                    .iter()
                    .map(|&feature| {
                        let value = row.feature(feature);
                        if value.is_finite() {
                            Ok(value)
                        } else {
                            Err(TaggerError::NonFiniteFeature { row: idx, feature })
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
