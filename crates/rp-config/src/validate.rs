//! Configuration validation errors and semantic validation.

use std::collections::HashSet;

use rp_common::NO_LAUNCH;
use thiserror::Error;

use crate::simulation::{Bounds, RateParams, SimulationConfig};
use crate::tagger::TaggerConfig;
use crate::Config;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SchemaError(_) => 62,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for rp_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IoError(msg) | ValidationError::ParseError(msg) => {
                rp_common::Error::Config(msg)
            }
            other => rp_common::Error::InvalidConfig(other.to_string()),
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate a complete configuration.
pub fn validate_config(config: &Config) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }
    validate_simulation(&config.simulation)?;
    validate_tagger(&config.tagger)?;
    Ok(())
}

/// Validate simulation parameters semantically.
pub fn validate_simulation(sim: &SimulationConfig) -> ValidationResult<()> {
    if sim.end < sim.start {
        return Err(ValidationError::SemanticError(format!(
            "end ({}) is before start ({})",
            sim.end, sim.start
        )));
    }

    if sim.regions.is_empty() {
        return Err(ValidationError::MissingField("simulation.regions".to_string()));
    }
    let mut seen = HashSet::new();
    for (i, region) in sim.regions.iter().enumerate() {
        let field = format!("simulation.regions[{}]", i);
        require_label(&format!("{field}.name"), &region.name)?;
        if !seen.insert(region.name.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "Duplicate region name '{}'",
                region.name
            )));
        }
        require_positive(&format!("{field}.base_revenue_usd_mn"), region.base_revenue_usd_mn)?;
        require_positive(
            &format!("{field}.marketing_baseline_usd_mn"),
            region.marketing_baseline_usd_mn,
        )?;
    }

    if sim.plans.is_empty() {
        return Err(ValidationError::MissingField("simulation.plans".to_string()));
    }
    let mut seen = HashSet::new();
    for (i, plan) in sim.plans.iter().enumerate() {
        let field = format!("simulation.plans[{}]", i);
        require_label(&format!("{field}.name"), &plan.name)?;
        if !seen.insert(plan.name.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "Duplicate plan name '{}'",
                plan.name
            )));
        }
        require_positive(&format!("{field}.multiplier"), plan.multiplier)?;
        require_finite(&format!("{field}.retention_offset"), plan.retention_offset)?;
    }

    for &m in &sim.seasonality.months {
        if !(1..=12).contains(&m) {
            return Err(invalid(
                "simulation.seasonality.months",
                format!("Month must be in 1..=12, got {}", m),
            ));
        }
    }
    require_finite("simulation.seasonality.uplift", sim.seasonality.uplift)?;
    if sim.seasonality.uplift <= -1.0 {
        return Err(invalid(
            "simulation.seasonality.uplift",
            format!("Must be greater than -1, got {}", sim.seasonality.uplift),
        ));
    }

    require_finite("simulation.growth.mean", sim.growth.mean)?;
    require_std_dev("simulation.growth.std_dev", sim.growth.std_dev)?;

    let subs = &sim.subscribers;
    require_positive("simulation.subscribers.per_revenue_mn", subs.per_revenue_mn)?;
    require_non_negative("simulation.subscribers.offset_max_mn", subs.offset_max_mn)?;
    if subs.damping <= 0.0 || subs.damping >= 1.0 || subs.damping.is_nan() {
        return Err(invalid(
            "simulation.subscribers.damping",
            format!("Must be in (0, 1), got {}", subs.damping),
        ));
    }
    require_std_dev("simulation.subscribers.noise_std_dev", subs.noise_std_dev)?;
    require_std_dev("simulation.revenue_noise_std_dev", sim.revenue_noise_std_dev)?;

    require_positive("simulation.marketing.factor_min", sim.marketing.factor_min)?;
    if !sim.marketing.factor_max.is_finite()
        || sim.marketing.factor_max < sim.marketing.factor_min
    {
        return Err(invalid(
            "simulation.marketing.factor_max",
            format!(
                "Must be >= factor_min ({}), got {}",
                sim.marketing.factor_min, sim.marketing.factor_max
            ),
        ));
    }

    validate_rate("simulation.adoption", &sim.adoption)?;
    validate_rate("simulation.retention", &sim.retention)?;

    let mut months = HashSet::new();
    for (i, event) in sim.calendar.iter().enumerate() {
        let field = format!("simulation.calendar[{}].label", i);
        require_label(&field, &event.label)?;
        if event.label == NO_LAUNCH {
            return Err(invalid(
                field,
                format!("'{}' is reserved for months without an event", NO_LAUNCH),
            ));
        }
        if !months.insert(event.month) {
            return Err(ValidationError::SemanticError(format!(
                "Duplicate content event for {}",
                event.month
            )));
        }
    }

    if let Some(shock) = &sim.shock {
        if !(0.0..=1.0).contains(&shock.probability) {
            return Err(invalid(
                "simulation.shock.probability",
                format!("Must be in [0, 1], got {}", shock.probability),
            ));
        }
        if shock.factors.is_empty() {
            return Err(ValidationError::MissingField(
                "simulation.shock.factors".to_string(),
            ));
        }
        for &factor in &shock.factors {
            require_positive("simulation.shock.factors", factor)?;
        }
    }

    Ok(())
}

/// Validate tagger parameters semantically.
pub fn validate_tagger(tagger: &TaggerConfig) -> ValidationResult<()> {
    if tagger.features.is_empty() {
        return Err(ValidationError::MissingField("tagger.features".to_string()));
    }
    let mut seen = HashSet::new();
    for feature in &tagger.features {
        if !seen.insert(*feature) {
            return Err(ValidationError::SemanticError(format!(
                "Feature '{}' listed more than once",
                feature
            )));
        }
    }
    validate_contamination(tagger.contamination)?;
    if tagger.n_estimators == 0 {
        return Err(invalid("tagger.n_estimators", "Must be at least 1"));
    }
    if tagger.max_samples < 2 {
        return Err(invalid(
            "tagger.max_samples",
            format!("Must be at least 2, got {}", tagger.max_samples),
        ));
    }
    Ok(())
}

/// Contamination must lie in (0, 0.5].
pub fn validate_contamination(contamination: f64) -> ValidationResult<()> {
    if contamination > 0.0 && contamination <= 0.5 {
        Ok(())
    } else {
        Err(invalid(
            "tagger.contamination",
            format!("Must be in (0, 0.5], got {}", contamination),
        ))
    }
}

fn validate_rate(field: &str, params: &RateParams) -> ValidationResult<()> {
    require_finite(&format!("{field}.mean"), params.mean)?;
    require_std_dev(&format!("{field}.std_dev"), params.std_dev)?;
    validate_bounds(&format!("{field}.bounds"), &params.bounds)
}

fn validate_bounds(field: &str, bounds: &Bounds) -> ValidationResult<()> {
    require_finite(&format!("{field}.min"), bounds.min)?;
    require_finite(&format!("{field}.max"), bounds.max)?;
    if bounds.min >= bounds.max {
        return Err(invalid(
            field,
            format!("min ({}) must be less than max ({})", bounds.min, bounds.max),
        ));
    }
    Ok(())
}

/// Names and labels are written to the CSV verbatim and trimmed on load, so
/// they must be non-empty and carry no surrounding whitespace.
fn require_label(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, "Must not be empty"));
    }
    if value.trim() != value {
        return Err(invalid(
            field,
            format!("Must not have leading or trailing whitespace, got {:?}", value),
        ));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("Must be finite, got {}", value)))
    }
}

fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("Must be positive, got {}", value)))
    }
}

fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("Must be non-negative, got {}", value)))
    }
}

fn require_std_dev(field: &str, value: f64) -> ValidationResult<()> {
    require_non_negative(field, value)
}
