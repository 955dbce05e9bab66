//! Structured fuzz target: arbitrary rows through a filter and the tagger.

#![no_main]

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use rp_common::{Feature, Row, NO_LAUNCH};
use rp_config::TaggerConfig;
use rp_core::{OutlierTagger, RowFilter, TaggerError};

const REGIONS: [&str; 3] = ["A", "B", "C"];
const PLANS: [&str; 2] = ["Basic", "Premium"];

#[derive(Debug, Arbitrary)]
struct FuzzRow {
    region: u8,
    plan: u8,
    month: u8,
    launch: bool,
    revenue: f64,
    subscribers: f64,
    growth: f64,
    marketing: f64,
    adoption: f64,
    retention: f64,
}

impl FuzzRow {
    fn into_row(self) -> Row {
        let month = u32::from(self.month % 12) + 1;
        Row {
            date: NaiveDate::from_ymd_opt(2022, month, 1).unwrap_or_default(),
            region: REGIONS[usize::from(self.region) % REGIONS.len()].to_string(),
            plan: PLANS[usize::from(self.plan) % PLANS.len()].to_string(),
            revenue_usd_mn: self.revenue,
            subscribers_mn: self.subscribers,
            growth_rate_pct: self.growth,
            marketing_spend_usd_mn: self.marketing,
            adoption_rate: self.adoption,
            retention_index: self.retention,
            content_launch: if self.launch { "Premiere" } else { NO_LAUNCH }.to_string(),
            anomaly_flag: None,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<FuzzRow>,
    region_mask: u8,
    marketing_range: Option<(f64, f64)>,
    feature_mask: u8,
    contamination_step: u8,
    seed: u64,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 512 {
        return;
    }

    let regions: Vec<&str> = REGIONS
        .iter()
        .enumerate()
        .filter(|(i, _)| input.region_mask & (1 << i) != 0)
        .map(|(_, r)| *r)
        .collect();
    let mut filter = RowFilter::new().with_regions(regions);
    if let Some((lo, hi)) = input.marketing_range {
        filter = filter.with_marketing_range(lo, hi);
    }

    let rows: Vec<Row> = input.rows.into_iter().map(FuzzRow::into_row).collect();
    let subset = filter.apply(rows);
    assert!(subset.iter().all(|r| filter.matches(r)));

    let mut features: Vec<Feature> = Feature::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| input.feature_mask & (1 << i) != 0)
        .map(|(_, f)| *f)
        .collect();
    if features.is_empty() {
        features.push(Feature::Revenue);
    }
    // Contamination in (0, 0.5].
    let contamination = f64::from(input.contamination_step % 50 + 1) / 100.0;
    let config = TaggerConfig::default()
        .with_features(features)
        .with_contamination(contamination)
        .with_seed(input.seed);
    let Ok(tagger) = OutlierTagger::new(config) else {
        return;
    };

    match tagger.evaluate(&subset) {
        Ok(report) => {
            assert_eq!(report.flags.len(), subset.len());
            assert!(report.scores.iter().all(|s| s.is_finite()));
        }
        Err(TaggerError::NonFiniteFeature { row, .. }) => assert!(row < subset.len()),
        Err(other) => panic!("unexpected tagger error: {other}"),
    }
});
