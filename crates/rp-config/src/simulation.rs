//! Simulation parameter tables.
//!
//! Everything the synthesizer reads lives here: the region and plan tables, the
//! distributions for each drawn quantity, the content calendar, and the seed.
//! Values are read-only once loaded; the synthesizer borrows them.

use rp_common::MonthKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::ContentEvent;

/// Parameters for one synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed for every random draw. Same seed and parameters give the same rows.
    pub seed: u64,

    /// First month generated (inclusive).
    pub start: MonthKey,

    /// Last month generated (inclusive).
    pub end: MonthKey,

    pub regions: Vec<RegionSpec>,

    pub plans: Vec<PlanSpec>,

    pub seasonality: Seasonality,

    pub growth: GrowthParams,

    pub subscribers: SubscriberParams,

    /// Std-dev of the additive Gaussian revenue noise (USD mn).
    pub revenue_noise_std_dev: f64,

    pub marketing: MarketingParams,

    pub adoption: RateParams,

    /// Retention draw; the mean is shifted by each plan's `retention_offset`.
    pub retention: RateParams,

    pub calendar: Vec<ContentEvent>,

    /// Random revenue shocks, independent of the outlier tagger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shock: Option<ShockParams>,
}

/// A region row in the parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RegionSpec {
    pub name: String,
    /// Monthly revenue level before plan scaling (USD mn).
    pub base_revenue_usd_mn: f64,
    /// Monthly marketing spend before the random factor (USD mn).
    pub marketing_baseline_usd_mn: f64,
}

/// A subscription plan row in the parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PlanSpec {
    pub name: String,
    /// Scale applied to the regional base revenue.
    pub multiplier: f64,
    /// Added to the retention mean for this plan.
    #[serde(default)]
    pub retention_offset: f64,
}

/// High-season revenue uplift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Seasonality {
    /// Calendar months (1-12) in the high season.
    pub months: Vec<u32>,
    /// Fractional uplift during the high season (0.10 = +10%).
    pub uplift: f64,
}

impl Default for Seasonality {
    fn default() -> Self {
        Seasonality {
            months: vec![10, 11, 12],
            uplift: 0.10,
        }
    }
}

impl Seasonality {
    /// Revenue multiplier for a month.
    pub fn multiplier(&self, month: MonthKey) -> f64 {
        if self.months.contains(&month.month()) {
            1.0 + self.uplift
        } else {
            1.0
        }
    }
}

/// How the monthly growth draw feeds into revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMode {
    /// Each month is `base × seasonal × (1 + growth)`; draws do not accumulate.
    #[default]
    Level,
    /// The revenue level is multiplied by `(1 + growth)` every month and carried forward.
    Compounding,
}

/// Monthly growth draw, as a fraction (0.005 = +0.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthParams {
    pub mean: f64,
    pub std_dev: f64,
    pub mode: GrowthMode,
}

impl Default for GrowthParams {
    fn default() -> Self {
        GrowthParams {
            mean: 0.005,
            std_dev: 0.015,
            mode: GrowthMode::Level,
        }
    }
}

/// Subscriber base and monthly response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SubscriberParams {
    /// Subscribers (mn) per USD mn of base revenue.
    pub per_revenue_mn: f64,
    /// Upper end of the uniform offset added once per (region, plan).
    pub offset_max_mn: f64,
    /// Share of the revenue growth draw passed on to subscribers, in (0, 1).
    pub damping: f64,
    /// Std-dev of the additive Gaussian subscriber noise (mn).
    pub noise_std_dev: f64,
}

impl Default for SubscriberParams {
    fn default() -> Self {
        SubscriberParams {
            per_revenue_mn: 0.08,
            offset_max_mn: 2.0,
            damping: 0.5,
            noise_std_dev: 0.25,
        }
    }
}

/// Multiplicative random factor on the regional marketing baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct MarketingParams {
    pub factor_min: f64,
    pub factor_max: f64,
}

impl Default for MarketingParams {
    fn default() -> Self {
        MarketingParams {
            factor_min: 0.85,
            factor_max: 1.15,
        }
    }
}

/// Closed clipping interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Gaussian draw clipped to bounds after sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RateParams {
    pub mean: f64,
    pub std_dev: f64,
    #[serde(default = "unit_bounds")]
    pub bounds: Bounds,
}

fn unit_bounds() -> Bounds {
    Bounds::UNIT
}

impl RateParams {
    pub fn adoption_default() -> Self {
        RateParams {
            mean: 0.62,
            std_dev: 0.08,
            bounds: Bounds::UNIT,
        }
    }

    pub fn retention_default() -> Self {
        RateParams {
            mean: 0.78,
            std_dev: 0.05,
            bounds: Bounds::UNIT,
        }
    }
}

/// Sudden multiplicative revenue jumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ShockParams {
    /// Per-row probability of a shock.
    pub probability: f64,
    /// Candidate factors, one picked uniformly per shock.
    pub factors: Vec<f64>,
}

impl Default for ShockParams {
    fn default() -> Self {
        ShockParams {
            probability: 0.03,
            factors: vec![0.8, 1.2],
        }
    }
}

pub(crate) fn region(name: &str, base: f64, marketing: f64) -> RegionSpec {
    RegionSpec {
        name: name.to_string(),
        base_revenue_usd_mn: base,
        marketing_baseline_usd_mn: marketing,
    }
}

pub(crate) fn plan(name: &str, multiplier: f64, retention_offset: f64) -> PlanSpec {
    PlanSpec {
        name: name.to_string(),
        multiplier,
        retention_offset,
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 42,
            start: MonthKey::from_literal(2020, 1),
            end: MonthKey::from_literal(2025, 11),
            regions: vec![
                region("North America", 850.0, 120.0),
                region("Latin America", 310.0, 45.0),
                region("Europe", 620.0, 90.0),
                region("APAC", 540.0, 80.0),
                region("Middle East & Africa", 180.0, 25.0),
            ],
            plans: vec![
                plan("Basic", 0.6, -0.05),
                plan("Standard", 1.0, 0.0),
                plan("Premium", 1.5, 0.05),
            ],
            seasonality: Seasonality::default(),
            growth: GrowthParams::default(),
            subscribers: SubscriberParams::default(),
            revenue_noise_std_dev: 5.0,
            marketing: MarketingParams::default(),
            adoption: RateParams::adoption_default(),
            retention: RateParams::retention_default(),
            calendar: crate::calendar::default_events(),
            shock: None,
        }
    }
}

impl SimulationConfig {
    /// Number of months in `[start, end]`.
    pub fn month_count(&self) -> usize {
        self.start.span_len(&self.end)
    }

    /// Rows a full run produces.
    pub fn expected_rows(&self) -> usize {
        self.regions.len() * self.plans.len() * self.month_count()
    }

    pub fn region(&self, name: &str) -> Option<&RegionSpec> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn plan(&self, name: &str) -> Option<&PlanSpec> {
        self.plans.iter().find(|p| p.name == name)
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder-style range override.
    pub fn with_range(mut self, start: MonthKey, end: MonthKey) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn test_default_dimensions() {
        let config = SimulationConfig::default();
        assert_eq!(config.regions.len(), 5);
        assert_eq!(config.plans.len(), 3);
        // 2020-01 ..= 2025-11
        assert_eq!(config.month_count(), 71);
        assert_eq!(config.expected_rows(), 5 * 3 * 71);
    }

    #[test]
    fn test_seasonal_multiplier_q4_only() {
        let s = Seasonality::default();
        assert_eq!(s.multiplier(month(2022, 9)), 1.0);
        assert!((s.multiplier(month(2022, 10)) - 1.10).abs() < 1e-12);
        assert!((s.multiplier(month(2022, 12)) - 1.10).abs() < 1e-12);
        assert_eq!(s.multiplier(month(2023, 1)), 1.0);
    }

    #[test]
    fn test_premium_retains_better_than_basic() {
        let config = SimulationConfig::default();
        let basic = config.plan("Basic").unwrap();
        let premium = config.plan("Premium").unwrap();
        assert!(premium.retention_offset > basic.retention_offset);
        assert!(premium.multiplier > basic.multiplier);
    }

    #[test]
    fn test_growth_mode_serde() {
        assert_eq!(
            serde_json::to_string(&GrowthMode::Compounding).unwrap(),
            "\"compounding\""
        );
        let parsed: GrowthParams =
            serde_json::from_str(r#"{"mean":0.01,"std_dev":0.02}"#).unwrap();
        assert_eq!(parsed.mode, GrowthMode::Level);
    }

    #[test]
    fn test_rate_params_default_bounds() {
        let parsed: RateParams = serde_json::from_str(r#"{"mean":0.5,"std_dev":0.1}"#).unwrap();
        assert_eq!(parsed.bounds, Bounds::UNIT);
        assert!(parsed.bounds.contains(0.0));
        assert!(!parsed.bounds.contains(1.01));
    }

    #[test]
    fn test_shock_absent_by_default() {
        let json = serde_json::to_string(&SimulationConfig::default()).unwrap();
        assert!(!json.contains("\"shock\""));
    }
}
