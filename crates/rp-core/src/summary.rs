//! KPI aggregation over a row set.

use rp_common::{MonthKey, Row};
use rp_math::{mean, min_max};
use serde::Serialize;

/// Per-region totals, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub rows: usize,
    pub revenue_bn: f64,
    pub subscribers_mn: f64,
    pub anomaly_count: usize,
}

/// Headline KPIs for a (possibly filtered) row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub row_count: usize,
    /// Sum of `revenue_usd_mn` / 1000.
    pub total_revenue_bn: f64,
    /// Sum of monthly subscriber counts across rows.
    pub total_subscribers_mn: f64,
    /// Mean of `growth_rate_pct`; `None` for an empty set.
    pub avg_growth_pct: Option<f64>,
    pub anomaly_count: usize,
    /// Whether every row carries a flag.
    pub tagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<(MonthKey, MonthKey)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_range: Option<(f64, f64)>,
    pub regions: Vec<RegionSummary>,
}

impl Summary {
    pub fn from_rows(rows: &[Row]) -> Self {
        let growth: Vec<f64> = rows.iter().map(|r| r.growth_rate_pct).collect();
        let marketing: Vec<f64> = rows.iter().map(|r| r.marketing_spend_usd_mn).collect();

        let period = rows
            .iter()
            .map(Row::month_key)
            .fold(None, |acc: Option<(MonthKey, MonthKey)>, m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            });

        let mut regions: Vec<RegionSummary> = Vec::new();
        for row in rows {
            let idx = match regions.iter().position(|r| r.region == row.region) {
                Some(i) => i,
                None => {
                    regions.push(RegionSummary {
                        region: row.region.clone(),
                        rows: 0,
                        revenue_bn: 0.0,
                        subscribers_mn: 0.0,
                        anomaly_count: 0,
                    });
                    regions.len() - 1
                }
            };
            let entry = &mut regions[idx];
            entry.rows += 1;
            entry.revenue_bn += row.revenue_usd_mn / 1e3;
            entry.subscribers_mn += row.subscribers_mn;
            if row.is_anomaly() {
                entry.anomaly_count += 1;
            }
        }

        Summary {
            row_count: rows.len(),
            total_revenue_bn: rows.iter().map(|r| r.revenue_usd_mn).sum::<f64>() / 1e3,
            total_subscribers_mn: rows.iter().map(|r| r.subscribers_mn).sum(),
            avg_growth_pct: (!growth.is_empty()).then(|| mean(&growth)),
            anomaly_count: rows.iter().filter(|r| r.is_anomaly()).count(),
            tagged: !rows.is_empty() && rows.iter().all(|r| r.anomaly_flag.is_some()),
            period,
            marketing_range: min_max(&marketing),
            regions,
        }
    }

    /// One-line rendering for `--format summary`.
    pub fn one_line(&self) -> String {
        let growth = self
            .avg_growth_pct
            .map(|g| format!("{g:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "rows={} revenue=${:.2}B subscribers={:.2}M avg_growth={} anomalies={}",
            self.row_count,
            self.total_revenue_bn,
            self.total_subscribers_mn,
            growth,
            self.anomaly_count
        )
    }
}
