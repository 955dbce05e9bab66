//! Dataset rows and scoring features.

use chrono::NaiveDate;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::month::MonthKey;

/// Label carried by rows whose month has no content event.
pub const NO_LAUNCH: &str = "none";

/// One month of one (region, plan) series.
///
/// Field order matches the canonical CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// First day of the month.
    pub date: NaiveDate,
    pub region: String,
    pub plan: String,
    pub revenue_usd_mn: f64,
    pub subscribers_mn: f64,
    /// Monthly growth draw, in percent.
    pub growth_rate_pct: f64,
    pub marketing_spend_usd_mn: f64,
    pub adoption_rate: f64,
    pub retention_index: f64,
    /// Content event label, or [`NO_LAUNCH`].
    pub content_launch: String,
    /// Set by the outlier tagger; `None` until the row set has been scored.
    pub anomaly_flag: Option<bool>,
}

impl Row {
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// Whether a content event falls in this row's month.
    pub fn has_content_launch(&self) -> bool {
        self.content_launch != NO_LAUNCH
    }

    /// Whether the tagger flagged this row. Untagged rows are never anomalous.
    pub fn is_anomaly(&self) -> bool {
        self.anomaly_flag == Some(true)
    }

    /// Value of a scoring feature.
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Revenue => self.revenue_usd_mn,
            Feature::Subscribers => self.subscribers_mn,
            Feature::GrowthRate => self.growth_rate_pct,
            Feature::MarketingSpend => self.marketing_spend_usd_mn,
            Feature::AdoptionRate => self.adoption_rate,
            Feature::RetentionIndex => self.retention_index,
        }
    }
}

/// Numeric columns the outlier tagger can score on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Revenue,
    Subscribers,
    GrowthRate,
    MarketingSpend,
    AdoptionRate,
    RetentionIndex,
}

impl Feature {
    pub const ALL: &'static [Feature] = &[
        Feature::Revenue,
        Feature::Subscribers,
        Feature::GrowthRate,
        Feature::MarketingSpend,
        Feature::AdoptionRate,
        Feature::RetentionIndex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Revenue => "revenue",
            Feature::Subscribers => "subscribers",
            Feature::GrowthRate => "growth_rate",
            Feature::MarketingSpend => "marketing_spend",
            Feature::AdoptionRate => "adoption_rate",
            Feature::RetentionIndex => "retention_index",
        }
    }

    /// Dataset column backing this feature.
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Revenue => "revenue_usd_mn",
            Feature::Subscribers => "subscribers_mn",
            Feature::GrowthRate => "growth_rate_pct",
            Feature::MarketingSpend => "marketing_spend_usd_mn",
            Feature::AdoptionRate => "adoption_rate",
            Feature::RetentionIndex => "retention_index",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
