//! Row selection for re-scoring and summaries.
//!
//! An empty set means "no restriction" on that column. The marketing range is
//! inclusive on both ends.

use std::collections::BTreeSet;

use rp_common::Row;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowFilter {
    pub regions: BTreeSet<String>,
    pub plans: BTreeSet<String>,
    pub content_launches: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_range: Option<(f64, f64)>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plans<I, S>(mut self, plans: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plans = plans.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content_launches<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_launches = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_marketing_range(mut self, min: f64, max: f64) -> Self {
        self.marketing_range = Some((min, max));
        self
    }

    /// True when nothing is excluded.
    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty()
            && self.plans.is_empty()
            && self.content_launches.is_empty()
            && self.marketing_range.is_none()
    }

    pub fn matches(&self, row: &Row) -> bool {
        (self.regions.is_empty() || self.regions.contains(&row.region))
            && (self.plans.is_empty() || self.plans.contains(&row.plan))
            && (self.content_launches.is_empty()
                || self.content_launches.contains(&row.content_launch))
            && self
                .marketing_range
                .is_none_or(|(lo, hi)| {
                    row.marketing_spend_usd_mn >= lo && row.marketing_spend_usd_mn <= hi
                })
    }

    /// Matching rows, in input order.
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}
