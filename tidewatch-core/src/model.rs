//! Physics-based contaminant diffusion estimator.
//!
//! Concentration at a distance from the source is the source concentration
//! attenuated by independent multiplicative effects: exponential decay with
//! distance (15 km) and depth (10 m), a linear temperature correction around
//! 20 °C, a near-neutral pH band, and a linear current pickup term.

use tidewatch_schemas::{
    environment::{BaseConditions, EnvironmentalVector},
    prediction::{DistancePrediction, FactorBreakdown, PredictionResult, RiskAssessment, RiskCategory},
};

/// Characteristic decay length with distance (km).
pub const DISTANCE_DECAY_KM: f64 = 15.0;
/// Characteristic decay length with depth (m).
pub const DEPTH_DECAY_M: f64 = 10.0;
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;
pub const TEMPERATURE_COEFFICIENT: f64 = 0.02;
pub const CURRENT_COEFFICIENT: f64 = 0.3;
pub const NEUTRAL_PH: f64 = 7.0;
/// Outside this band around neutral the pH effect drops to `OFF_NEUTRAL_PH_EFFECT`.
pub const NEUTRAL_PH_BAND: f64 = 1.0;
pub const OFF_NEUTRAL_PH_EFFECT: f64 = 0.8;
/// Predictions never drop below this floor.
pub const MIN_CONCENTRATION: f64 = 0.001;
/// The estimator is deterministic, so its confidence is a fixed constant.
pub const PHYSICS_CONFIDENCE: f64 = 0.7;

/// Inputs that are physically implausible but still evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainWarning {
    PhOutOfRange(f64),
    NegativeDistance(f64),
    NegativeDepth(f64),
    NegativeCurrentSpeed(f64),
    NegativeWindSpeed(f64),
    NonPositiveSourceConcentration(f64),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffusionModel;

impl DiffusionModel {
    pub fn new() -> Self {
        Self
    }

    /// Predicts the concentration at `input.distance` from the source.
    ///
    /// Total over finite inputs; out-of-range values are evaluated as given
    /// (see [`check_domain`]).
    pub fn predict(&self, input: &EnvironmentalVector) -> PredictionResult {
        let distance_decay = (-input.distance / DISTANCE_DECAY_KM).exp();
        let temperature_effect =
            1.0 + (input.temperature - REFERENCE_TEMPERATURE_C) * TEMPERATURE_COEFFICIENT;
        let ph_effect = if is_near_neutral(input.ph) { 1.0 } else { OFF_NEUTRAL_PH_EFFECT };
        // More current raises the concentration picked up at the query point.
        let current_effect = 1.0 + input.current_speed * CURRENT_COEFFICIENT;
        let depth_effect = (-input.depth / DEPTH_DECAY_M).exp();

        let predicted = input.source_concentration
            * distance_decay
            * temperature_effect
            * ph_effect
            * current_effect
            * depth_effect;

        PredictionResult {
            predicted_concentration: predicted.max(MIN_CONCENTRATION),
            confidence: PHYSICS_CONFIDENCE,
            factors: self.analyze_factors(input),
        }
    }

    /// Diagnostic breakdown of which conditions dominate a prediction.
    pub fn analyze_factors(&self, input: &EnvironmentalVector) -> FactorBreakdown {
        FactorBreakdown {
            distance: (-input.distance / DISTANCE_DECAY_KM).exp(),
            temperature: 1.0
                - (input.temperature - REFERENCE_TEMPERATURE_C).abs() / REFERENCE_TEMPERATURE_C,
            hydrodynamics: (input.current_speed + input.wind_speed / 10.0) / 3.0,
            chemical: if is_near_neutral(input.ph) { 1.0 } else { 0.5 },
        }
    }

    /// Predicts at each distance in order. Duplicates are kept.
    pub fn predict_multiple_distances(
        &self,
        base: &BaseConditions,
        distances: &[f64],
    ) -> Vec<DistancePrediction> {
        distances
            .iter()
            .map(|&distance| DistancePrediction {
                distance,
                prediction: self.predict(&base.at_distance(distance)),
            })
            .collect()
    }

    /// Bands a prediction against a caller-supplied toxic threshold (> 0).
    pub fn assess_risk(&self, prediction: &PredictionResult, toxic_threshold: f64) -> RiskAssessment {
        classify_concentration(prediction.predicted_concentration, toxic_threshold)
    }
}

/// Risk banding of a concentration against a threshold.
///
/// Bands are checked top-down with strict `>`, so a ratio of exactly 1.0 is
/// `High`, not `Critical`.
pub fn classify_concentration(concentration: f64, toxic_threshold: f64) -> RiskAssessment {
    let ratio = concentration / toxic_threshold;
    let category = if ratio > 1.0 {
        RiskCategory::Critical
    } else if ratio > 0.8 {
        RiskCategory::High
    } else if ratio > 0.6 {
        RiskCategory::Medium
    } else if ratio > 0.3 {
        RiskCategory::LowMedium
    } else {
        RiskCategory::Low
    };

    RiskAssessment {
        risk_level: category.level(),
        risk_category: category,
        exceeds_threshold: ratio > 1.0,
        safety_margin: (1.0 - ratio).max(0.0),
    }
}

/// Lists the physically implausible values in `input`. The model does not
/// reject any of them.
pub fn check_domain(input: &EnvironmentalVector) -> Vec<DomainWarning> {
    let mut warnings = Vec::new();
    if !(0.0..=14.0).contains(&input.ph) {
        warnings.push(DomainWarning::PhOutOfRange(input.ph));
    }
    if input.distance < 0.0 {
        warnings.push(DomainWarning::NegativeDistance(input.distance));
    }
    if input.depth < 0.0 {
        warnings.push(DomainWarning::NegativeDepth(input.depth));
    }
    if input.current_speed < 0.0 {
        warnings.push(DomainWarning::NegativeCurrentSpeed(input.current_speed));
    }
    if input.wind_speed < 0.0 {
        warnings.push(DomainWarning::NegativeWindSpeed(input.wind_speed));
    }
    if input.source_concentration <= 0.0 {
        warnings.push(DomainWarning::NonPositiveSourceConcentration(input.source_concentration));
    }
    warnings
}

fn is_near_neutral(ph: f64) -> bool {
    (ph - NEUTRAL_PH).abs() < NEUTRAL_PH_BAND
}
