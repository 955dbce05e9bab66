//! Structural checks on a row set.
//!
//! Every (region, plan) group must be a strictly increasing, gap-free run of
//! first-of-month dates. Optional expectations add a fixed span, the exact set
//! of (region, plan) groups, and rate bounds.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use rp_common::{MonthKey, Row};
use rp_config::{Bounds, SimulationConfig};
use serde::Serialize;

/// What a series is expected to look like beyond basic contiguity.
#[derive(Debug, Clone, Default)]
pub struct SeriesExpectation {
    /// Inclusive span every group must cover exactly.
    pub range: Option<(MonthKey, MonthKey)>,
    /// Exact (region, plan) set the rows must cover.
    pub groups: Option<BTreeSet<(String, String)>>,
    pub adoption_bounds: Option<Bounds>,
    pub retention_bounds: Option<Bounds>,
}

impl SeriesExpectation {
    /// Expectations implied by the parameters that generated the rows.
    pub fn from_simulation(config: &SimulationConfig) -> Self {
        SeriesExpectation {
            range: Some((config.start, config.end)),
            groups: Some(
                config
                    .regions
                    .iter()
                    .flat_map(|r| config.plans.iter().map(|p| (r.name.clone(), p.name.clone())))
                    .collect(),
            ),
            adoption_bounds: Some(config.adoption.bounds),
            retention_bounds: Some(config.retention.bounds),
        }
    }
}

/// A single structural defect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesIssue {
    NotFirstOfMonth { row: usize, date: String },
    Duplicate { region: String, plan: String, month: String },
    OutOfOrder { region: String, plan: String, month: String },
    Gap { region: String, plan: String, after: String, before: String },
    RangeMismatch { region: String, plan: String, first: String, last: String },
    MissingGroup { region: String, plan: String },
    UnexpectedGroup { region: String, plan: String },
    OutOfBounds { row: usize, column: String, value: f64 },
}

/// Result of [`validate_series`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesReport {
    pub rows: usize,
    pub groups: usize,
    pub issues: Vec<SeriesIssue>,
}

impl SeriesReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn validate_series(rows: &[Row], expect: &SeriesExpectation) -> SeriesReport {
    let mut issues = Vec::new();
    // Months per group, in row order.
    let mut groups: BTreeMap<(&str, &str), Vec<MonthKey>> = BTreeMap::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.date.day() != 1 {
            issues.push(SeriesIssue::NotFirstOfMonth {
                row: idx,
                date: row.date.to_string(),
            });
        }
        groups
            .entry((row.region.as_str(), row.plan.as_str()))
            .or_default()
            .push(row.month_key());

        check_bounds(&mut issues, idx, "adoption_rate", row.adoption_rate, expect.adoption_bounds);
        check_bounds(
            &mut issues,
            idx,
            "retention_index",
            row.retention_index,
            expect.retention_bounds,
        );
    }

    for (&(region, plan), months) in &groups {
        for pair in months.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            match next.months_since(&prev) {
                1 => {}
                0 => issues.push(SeriesIssue::Duplicate {
                    region: region.to_string(),
                    plan: plan.to_string(),
                    month: next.to_string(),
                }),
                d if d < 0 => issues.push(SeriesIssue::OutOfOrder {
                    region: region.to_string(),
                    plan: plan.to_string(),
                    month: next.to_string(),
                }),
                _ => issues.push(SeriesIssue::Gap {
                    region: region.to_string(),
                    plan: plan.to_string(),
                    after: prev.to_string(),
                    before: next.to_string(),
                }),
            }
        }

        if let (Some((start, end)), Some(first), Some(last)) =
            (expect.range, months.first(), months.last())
        {
            if *first != start || *last != end {
                issues.push(SeriesIssue::RangeMismatch {
                    region: region.to_string(),
                    plan: plan.to_string(),
                    first: first.to_string(),
                    last: last.to_string(),
                });
            }
        }
    }

    if let Some(expected) = &expect.groups {
        for (region, plan) in expected {
            if !groups.contains_key(&(region.as_str(), plan.as_str())) {
                issues.push(SeriesIssue::MissingGroup {
                    region: region.clone(),
                    plan: plan.clone(),
                });
            }
        }
        for &(region, plan) in groups.keys() {
            if !expected.contains(&(region.to_string(), plan.to_string())) {
                issues.push(SeriesIssue::UnexpectedGroup {
                    region: region.to_string(),
                    plan: plan.to_string(),
                });
            }
        }
    }

    SeriesReport {
        rows: rows.len(),
        groups: groups.len(),
        issues,
    }
}

fn check_bounds(
    issues: &mut Vec<SeriesIssue>,
    row: usize,
    column: &str,
    value: f64,
    bounds: Option<Bounds>,
) {
    if let Some(b) = bounds {
        if !b.contains(value) {
            issues.push(SeriesIssue::OutOfBounds {
                row,
                column: column.to_string(),
                value,
            });
        }
    }
}
