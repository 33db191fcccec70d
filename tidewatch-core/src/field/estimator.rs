use crate::geo::haversine_distance_m;
use rand::Rng;
use std::cmp::Ordering;
use tidewatch_schemas::{
    environment::GeoPoint,
    field::{FieldPrediction, Influence},
    source::{ConcentrationLevel, PointSource},
    zone::PollutionZone,
};

/// Sources at or beyond this distance (m) contribute nothing.
pub const DEFAULT_CUTOFF_M: f64 = 15_000.0;
/// Ambient background concentration range.
pub const DEFAULT_BACKGROUND_RANGE: (f64, f64) = (0.001, 0.003);
/// Contributions at or below this are treated as absent.
pub const MIN_INFLUENCE: f64 = 0.0001;

/// Near-field decay length (m).
pub const PRIMARY_DECAY_M: f64 = 2_500.0;
/// Far-field tail decay length (m) and weight.
pub const SECONDARY_DECAY_M: f64 = 8_000.0;
pub const SECONDARY_WEIGHT: f64 = 0.1;
pub const WIND_SCALE: f64 = 150.0;
pub const DEPTH_FACTOR_RANGE_M: f64 = 20_000.0;
pub const MIN_DEPTH_FACTOR: f64 = 0.1;
pub const COASTAL_RANGE_M: f64 = 3_000.0;
pub const COASTAL_EFFECT: f64 = 1.2;
/// Natural variation is drawn uniformly from `1 ± NATURAL_VARIATION`.
pub const NATURAL_VARIATION: f64 = 0.15;

pub const ZONE_RADIUS_SCALE: f64 = 2.5;
pub const ZONE_PROXIMITY_EXPONENT: f64 = 1.2;
pub const ZONE_CURVE_EXPONENT: f64 = 1.8;

pub const BACKGROUND_LABEL: &str = "Natural background";

/// Estimates the total concentration at arbitrary points from a fixed set of
/// sources and zones. Immutable once built; randomness is supplied per call.
#[derive(Debug, Clone)]
pub struct FieldEstimator {
    pub(super) sources: Vec<PointSource>,
    pub(super) zones: Vec<PollutionZone>,
    pub(super) zone_level: ConcentrationLevel,
    pub(super) zone_multiplier: f64,
    pub(super) wind_speed: f64,
    pub(super) background_range: (f64, f64),
    pub(super) cutoff_m: f64,
}

impl FieldEstimator {
    pub fn sources(&self) -> &[PointSource] {
        &self.sources
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Superposes every source and zone contribution at `point`, adds an
    /// ambient background draw, and returns influences strongest first.
    ///
    /// Source contributions carry ±15% natural variation drawn from `rng`.
    pub fn predict_at<R: Rng + ?Sized>(&self, point: GeoPoint, rng: &mut R) -> FieldPrediction {
        let mut total = 0.0;
        let mut influences = Vec::new();

        for source in &self.sources {
            let distance = haversine_distance_m(point, source.effective_location());
            if distance >= self.cutoff_m {
                continue;
            }

            let base = source.base_influence();
            let expected = source_influence(base, distance, self.wind_speed);
            let variation = 1.0 - NATURAL_VARIATION + rng.gen::<f64>() * 2.0 * NATURAL_VARIATION;
            let influence = expected * variation;
            log::debug!(
                "{}: {:.0} m, expected {:.6}, drawn {:.6}",
                source.source_id,
                distance,
                expected,
                influence
            );

            if influence > MIN_INFLUENCE {
                total += influence;
                influences.push(Influence {
                    source: source.name.clone(),
                    distance_m: distance.round(),
                    influence,
                    level: source.level,
                    contribution: influence / base * 100.0,
                });
            }
        }

        for zone in &self.zones {
            let distance = haversine_distance_m(point, zone.center);
            let Some(level_concentration) = zone.levels.get(self.zone_level) else {
                continue;
            };
            let base = level_concentration * self.zone_multiplier;
            if let Some((influence, proximity)) = zone_influence(base, distance, zone.radius_m) {
                if influence > MIN_INFLUENCE {
                    total += influence;
                    influences.push(Influence {
                        source: zone.name.clone(),
                        distance_m: distance.round(),
                        influence,
                        level: self.zone_level,
                        contribution: proximity * 100.0,
                    });
                }
            }
        }

        let (bg_min, bg_max) = self.background_range;
        let background = bg_min + rng.gen::<f64>() * (bg_max - bg_min);
        total += background;

        if influences.is_empty() {
            influences.push(Influence {
                source: BACKGROUND_LABEL.to_string(),
                distance_m: 0.0,
                influence: background,
                level: ConcentrationLevel::Natural,
                contribution: 100.0,
            });
        }

        influences.sort_by(|a, b| b.influence.partial_cmp(&a.influence).unwrap_or(Ordering::Equal));

        FieldPrediction {
            total_concentration: total.max(0.0),
            influences,
        }
    }
}

/// Noise-free contribution of a source with base influence `base` at
/// `distance_m`, before the cutoff is applied.
pub fn source_influence(base: f64, distance_m: f64, wind_speed: f64) -> f64 {
    let primary = (-distance_m / PRIMARY_DECAY_M).exp();
    let secondary = (-distance_m / SECONDARY_DECAY_M).exp() * SECONDARY_WEIGHT;
    let wind_effect = 1.0 + wind_speed / WIND_SCALE;
    let depth_factor = (1.0 - distance_m / DEPTH_FACTOR_RANGE_M).max(MIN_DEPTH_FACTOR);
    let coastal_effect = if distance_m < COASTAL_RANGE_M { COASTAL_EFFECT } else { 1.0 };
    base * (primary + secondary) * wind_effect * depth_factor * coastal_effect
}

/// Contribution of a zone and its proximity factor, or `None` outside the
/// zone's effective radius.
pub fn zone_influence(base: f64, distance_m: f64, radius_m: f64) -> Option<(f64, f64)> {
    let effective_radius = radius_m * ZONE_RADIUS_SCALE;
    if distance_m >= effective_radius {
        return None;
    }
    let proximity = (1.0 - (distance_m / effective_radius).powf(ZONE_PROXIMITY_EXPONENT)).max(0.0);
    Some((base * proximity.powf(ZONE_CURVE_EXPONENT), proximity))
}
