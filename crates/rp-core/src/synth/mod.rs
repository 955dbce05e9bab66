//! Series synthesizer.
//!
//! Produces one row per (region, plan, month). Per group:
//!
//! 1. Base revenue = regional base × plan multiplier.
//! 2. Base subscribers = base revenue × `per_revenue_mn` + U[0, `offset_max_mn`],
//!    drawn once per group.
//! 3. Each month, in order:
//!    - growth `g ~ N(mean, sd)`
//!    - revenue = level × seasonal × (1 + g) + N(0, revenue noise), where level
//!      is the base (level mode) or the running product of `(1 + g)` draws
//!      (compounding mode)
//!    - subscribers = base subscribers × (1 + g × damping) + N(0, subscriber noise)
//!    - marketing = regional baseline × U[factor_min, factor_max]
//!    - adoption, retention drawn, rounded to four decimals, then clipped to
//!      their bounds
//!    - content label looked up in the calendar
//!    - optional multiplicative revenue shock
//!
//! Negative growth and even negative revenue are valid outputs. Only adoption
//! and retention are bounded.

pub mod seed;

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rp_common::{Error, MonthKey, Result, Row};
use rp_config::{
    validate_simulation, ContentCalendar, GrowthMode, PlanSpec, RegionSpec, SimulationConfig,
};
use rp_math::{clip, round_to};

pub use seed::{group_rng, group_seed};

/// Normal distributions shared by every group.
#[derive(Debug, Clone)]
struct Draws {
    growth: Normal<f64>,
    revenue_noise: Normal<f64>,
    subscriber_noise: Normal<f64>,
    adoption: Normal<f64>,
    /// One per plan, in plan table order; the mean carries the plan offset.
    retention: Vec<Normal<f64>>,
}

fn normal(field: &str, mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev)
        .map_err(|e| Error::Synthesis(format!("{field}: N({mean}, {std_dev}): {e}")))
}

impl Draws {
    fn new(config: &SimulationConfig) -> Result<Self> {
        let retention = config
            .plans
            .iter()
            .map(|plan| {
                normal(
                    "retention",
                    config.retention.mean + plan.retention_offset,
                    config.retention.std_dev,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Draws {
            growth: normal("growth", config.growth.mean, config.growth.std_dev)?,
            revenue_noise: normal("revenue_noise", 0.0, config.revenue_noise_std_dev)?,
            subscriber_noise: normal(
                "subscriber_noise",
                0.0,
                config.subscribers.noise_std_dev,
            )?,
            adoption: normal("adoption", config.adoption.mean, config.adoption.std_dev)?,
            retention,
        })
    }
}

/// Deterministic series generator over a validated parameter set.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SimulationConfig,
    calendar: ContentCalendar,
    draws: Draws,
}

impl Synthesizer {
    /// Validate the parameters and prepare the distributions.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        validate_simulation(&config)?;
        let calendar = ContentCalendar::from_events(&config.calendar);
        let draws = Draws::new(&config)?;
        Ok(Synthesizer {
            config,
            calendar,
            draws,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Months covered, in order.
    pub fn months(&self) -> Vec<MonthKey> {
        self.config
            .start
            .range_inclusive(self.config.end)
            .collect()
    }

    /// Every group, ordered by region table order, then plan table order, then date.
    ///
    /// Rows come back untagged.
    pub fn generate(&self) -> Vec<Row> {
        let months = self.months();
        let mut rows = Vec::with_capacity(self.config.expected_rows());
        for region in &self.config.regions {
            for (plan_idx, plan) in self.config.plans.iter().enumerate() {
                rows.extend(self.series(region, plan, plan_idx, &months));
            }
        }
        rows
    }

    /// One (region, plan) series. Identical to that group's slice of [`generate`](Self::generate).
    pub fn generate_group(&self, region: &str, plan: &str) -> Result<Vec<Row>> {
        let region_spec = self
            .config
            .region(region)
            .ok_or_else(|| Error::Synthesis(format!("unknown region '{region}'")))?;
        let (plan_idx, plan_spec) = self
            .config
            .plans
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == plan)
            .ok_or_else(|| Error::Synthesis(format!("unknown plan '{plan}'")))?;
        Ok(self.series(region_spec, plan_spec, plan_idx, &self.months()))
    }

    fn series(
        &self,
        region: &RegionSpec,
        plan: &PlanSpec,
        plan_idx: usize,
        months: &[MonthKey],
    ) -> Vec<Row> {
        let cfg = &self.config;
        let mut rng = group_rng(cfg.seed, &region.name, &plan.name);

        let base_revenue = region.base_revenue_usd_mn * plan.multiplier;
        let base_subscribers = base_revenue * cfg.subscribers.per_revenue_mn
            + uniform(&mut rng, 0.0, cfg.subscribers.offset_max_mn);
        let mut level = base_revenue;

        let mut rows = Vec::with_capacity(months.len());
        for &month in months {
            let growth = self.draws.growth.sample(&mut rng);
            let seasonal = cfg.seasonality.multiplier(month);

            let trend = match cfg.growth.mode {
                GrowthMode::Level => base_revenue * (1.0 + growth),
                GrowthMode::Compounding => {
                    level *= 1.0 + growth;
                    level
                }
            };
            let mut revenue = trend * seasonal + self.draws.revenue_noise.sample(&mut rng);

            let subscribers = base_subscribers * (1.0 + growth * cfg.subscribers.damping)
                + self.draws.subscriber_noise.sample(&mut rng);

            let marketing = region.marketing_baseline_usd_mn
                * uniform(&mut rng, cfg.marketing.factor_min, cfg.marketing.factor_max);

            // Rounded before clipping so the stored value stays inside bounds
            // that carry more than four decimals.
            let adoption = clip(
                round_to(self.draws.adoption.sample(&mut rng), 4),
                cfg.adoption.bounds.min,
                cfg.adoption.bounds.max,
            );
            let retention = clip(
                round_to(self.draws.retention[plan_idx].sample(&mut rng), 4),
                cfg.retention.bounds.min,
                cfg.retention.bounds.max,
            );

            if let Some(shock) = &cfg.shock {
                if rng.random_bool(shock.probability) {
                    let factor = shock.factors[rng.random_range(0..shock.factors.len())];
                    revenue *= factor;
                    if cfg.growth.mode == GrowthMode::Compounding {
                        level *= factor;
                    }
                }
            }

            rows.push(Row {
                date: month.first_day(),
                region: region.name.clone(),
                plan: plan.name.clone(),
                revenue_usd_mn: round_to(revenue, 2),
                subscribers_mn: round_to(subscribers, 3),
                growth_rate_pct: round_to(growth * 100.0, 3),
                marketing_spend_usd_mn: round_to(marketing, 2),
                adoption_rate: adoption,
                retention_index: retention,
                content_launch: self.calendar.label_for(month).to_string(),
                anomaly_flag: None,
            });
        }
        rows
    }
}

/// Uniform draw over `[lo, hi]`; returns `lo` for a degenerate interval.
fn uniform(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_config::{get_preset, PresetName, ShockParams};
    use rp_common::NO_LAUNCH;

    fn compact() -> SimulationConfig {
        get_preset(PresetName::Compact).simulation
    }

    #[test]
    fn test_compact_row_count_and_order() {
        let synth = Synthesizer::new(compact()).unwrap();
        let rows = synth.generate();
        assert_eq!(rows.len(), 48);

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.region.as_str(), r.plan.as_str()))
            .collect();
        assert_eq!(keys[0], ("A", "Basic"));
        assert_eq!(keys[12], ("A", "Premium"));
        assert_eq!(keys[24], ("B", "Basic"));
        assert_eq!(keys[47], ("B", "Premium"));
        assert!(rows.iter().all(|r| r.anomaly_flag.is_none()));
    }

    #[test]
    fn test_generate_group_matches_full_run() {
        let synth = Synthesizer::new(compact()).unwrap();
        let all = synth.generate();
        let group = synth.generate_group("B", "Basic").unwrap();
        assert_eq!(group.as_slice(), &all[24..36]);
    }

    #[test]
    fn test_unknown_group_is_error() {
        let synth = Synthesizer::new(compact()).unwrap();
        assert!(matches!(
            synth.generate_group("Mars", "Basic"),
            Err(Error::Synthesis(_))
        ));
        assert!(synth.generate_group("A", "Ultra").is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = compact();
        config.regions.clear();
        assert!(matches!(
            Synthesizer::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_group_independent_of_other_groups() {
        let full = Synthesizer::new(compact()).unwrap();
        let mut reduced_config = compact();
        reduced_config.regions.retain(|r| r.name == "B");
        reduced_config.plans.reverse();
        let reduced = Synthesizer::new(reduced_config).unwrap();

        assert_eq!(
            full.generate_group("B", "Premium").unwrap(),
            reduced.generate_group("B", "Premium").unwrap()
        );
    }

    #[test]
    fn test_seed_changes_output() {
        let a = Synthesizer::new(compact()).unwrap().generate();
        let b = Synthesizer::new(compact().with_seed(99)).unwrap().generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_noise_level_mode_is_exact() {
        let mut config = compact();
        config.growth.std_dev = 0.0;
        config.growth.mean = 0.01;
        config.revenue_noise_std_dev = 0.0;
        config.subscribers.noise_std_dev = 0.0;
        config.subscribers.offset_max_mn = 0.0;
        let synth = Synthesizer::new(config).unwrap();
        let rows = synth.generate_group("A", "Premium").unwrap();

        // base = 100 × 1.5 = 150; Jan: 150 × 1.01 = 151.5; Oct: × 1.10 = 166.65
        assert_eq!(rows[0].revenue_usd_mn, 151.5);
        assert_eq!(rows[9].revenue_usd_mn, 166.65);
        assert_eq!(rows[0].growth_rate_pct, 1.0);
        // subscribers = 150 × 0.08 × (1 + 0.01 × 0.5) = 12.06
        assert_eq!(rows[0].subscribers_mn, 12.06);
    }

    #[test]
    fn test_zero_noise_compounding_mode_accumulates() {
        let mut config = compact();
        config.growth.std_dev = 0.0;
        config.growth.mean = 0.01;
        config.growth.mode = GrowthMode::Compounding;
        config.revenue_noise_std_dev = 0.0;
        let synth = Synthesizer::new(config).unwrap();
        let rows = synth.generate_group("A", "Basic").unwrap();

        // base = 100; Mar = 100 × 1.01^3
        assert_eq!(rows[2].revenue_usd_mn, round_to(100.0 * 1.01f64.powi(3), 2));
        assert!(rows[8].revenue_usd_mn > rows[7].revenue_usd_mn);
    }

    #[test]
    fn test_certain_shock_applies_factor() {
        let mut config = compact();
        config.growth.std_dev = 0.0;
        config.growth.mean = 0.0;
        config.revenue_noise_std_dev = 0.0;
        config.shock = Some(ShockParams {
            probability: 1.0,
            factors: vec![0.8],
        });
        let synth = Synthesizer::new(config).unwrap();
        let rows = synth.generate_group("A", "Basic").unwrap();
        assert_eq!(rows[0].revenue_usd_mn, 80.0);
    }

    #[test]
    fn test_rates_clipped_to_bounds() {
        let mut config = compact();
        config.adoption.std_dev = 5.0;
        config.retention.std_dev = 5.0;
        let synth = Synthesizer::new(config.clone()).unwrap();
        for row in synth.generate() {
            assert!(config.adoption.bounds.contains(row.adoption_rate));
            assert!(config.retention.bounds.contains(row.retention_index));
        }
    }

    #[test]
    fn test_fine_grained_bounds_hold_after_rounding() {
        let mut config = compact();
        config.adoption.mean = 0.0;
        config.adoption.std_dev = 0.01;
        config.adoption.bounds.min = 0.12344;
        config.adoption.bounds.max = 0.9;
        config.retention.bounds.max = 0.98765;
        config.retention.std_dev = 5.0;
        let synth = Synthesizer::new(config.clone()).unwrap();
        let rows = synth.generate();
        for row in &rows {
            assert!(config.adoption.bounds.contains(row.adoption_rate), "{}", row.adoption_rate);
            assert!(config.retention.bounds.contains(row.retention_index));
        }
        assert!(rows.iter().all(|r| r.adoption_rate == 0.12344));

        let report = crate::dataset::validate_series(
            &rows,
            &crate::dataset::SeriesExpectation::from_simulation(&config),
        );
        assert!(report.is_valid(), "{:?}", report.issues);
    }

    #[test]
    fn test_calendar_labels() {
        let synth = Synthesizer::new(compact()).unwrap();
        for row in synth.generate() {
            match row.month_key().month() {
                5 => assert_eq!(row.content_launch, "Spring Premiere"),
                11 => assert_eq!(row.content_launch, "Holiday Special"),
                _ => assert_eq!(row.content_launch, NO_LAUNCH),
            }
        }
    }

    #[test]
    fn test_marketing_within_factor_range() {
        let config = compact();
        let synth = Synthesizer::new(config.clone()).unwrap();
        for row in synth.generate() {
            let baseline = config.region(&row.region).unwrap().marketing_baseline_usd_mn;
            let lo = round_to(baseline * config.marketing.factor_min, 2);
            let hi = round_to(baseline * config.marketing.factor_max, 2);
            assert!(row.marketing_spend_usd_mn >= lo && row.marketing_spend_usd_mn <= hi);
        }
    }
}
