use super::estimator::{FieldEstimator, DEFAULT_BACKGROUND_RANGE, DEFAULT_CUTOFF_M};
use crate::error::TidewatchError;
use tidewatch_schemas::{
    scenario::TimeSlot,
    source::{ConcentrationLevel, PointSource},
    zone::PollutionZone,
};

/// A fluent builder for constructing a `FieldEstimator`.
///
/// Sources, zones and a time slot can be supplied in any order; the slot's
/// multiplier and wind speed are applied when the estimator is built.
#[derive(Default)]
pub struct FieldEstimatorBuilder {
    sources: Vec<PointSource>,
    zones: Vec<PollutionZone>,
    time_slot: Option<TimeSlot>,
    wind_speed: Option<f64>,
    zone_level: Option<ConcentrationLevel>,
    background_range: Option<(f64, f64)>,
    cutoff_m: Option<f64>,
}

impl FieldEstimatorBuilder {
    /// Creates a new, empty `FieldEstimatorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the point sources evaluated at every query.
    pub fn with_sources(mut self, sources: Vec<PointSource>) -> Self {
        self.sources = sources;
        self
    }

    /// Sets the area pollution zones evaluated at every query.
    pub fn with_zones(mut self, zones: Vec<PollutionZone>) -> Self {
        self.zones = zones;
        self
    }

    /// Selects the time slot whose multiplier scales every source and zone
    /// and whose wind speed drives the wind effect.
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slot = Some(slot);
        self
    }

    /// Overrides the wind speed (km/h) of the time slot.
    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = Some(wind_speed);
        self
    }

    /// Chooses which measured level of each zone is used. Defaults to `medium`.
    pub fn with_zone_level(mut self, level: ConcentrationLevel) -> Self {
        self.zone_level = Some(level);
        self
    }

    /// Sets the `[min, max]` range the ambient background term is drawn from.
    pub fn with_background_range(mut self, min: f64, max: f64) -> Self {
        self.background_range = Some((min, max));
        self
    }

    /// Sets the distance (m) beyond which a source contributes nothing.
    pub fn with_cutoff_m(mut self, cutoff_m: f64) -> Self {
        self.cutoff_m = Some(cutoff_m);
        self
    }

    /// Consumes the builder and returns a configured `FieldEstimator`.
    ///
    /// # Errors
    ///
    /// Returns a `TidewatchError` for an unordered or negative background
    /// range, a zone level the zones do not define, or a source whose base
    /// concentration or temporal multiplier is not positive.
    pub fn build(self) -> Result<FieldEstimator, TidewatchError> {
        let (bg_min, bg_max) = self.background_range.unwrap_or(DEFAULT_BACKGROUND_RANGE);
        if !(bg_min >= 0.0 && bg_max >= bg_min) {
            return Err(TidewatchError::InvalidBackgroundRange(bg_min, bg_max));
        }

        let zone_level = self.zone_level.unwrap_or(ConcentrationLevel::Medium);
        if !self.zones.is_empty() && matches!(zone_level, ConcentrationLevel::Natural | ConcentrationLevel::Critical) {
            return Err(TidewatchError::ConfigError(format!(
                "Zones have no '{}' level",
                zone_level
            )));
        }

        let cutoff_m = self.cutoff_m.unwrap_or(DEFAULT_CUTOFF_M);
        if !(cutoff_m > 0.0) {
            return Err(TidewatchError::ConfigError(format!(
                "Cutoff distance must be positive, got {}",
                cutoff_m
            )));
        }

        let multiplier = self.time_slot.as_ref().map(|s| s.multiplier);
        let wind_speed = self
            .wind_speed
            .or_else(|| self.time_slot.as_ref().map(|s| s.wind_speed))
            .unwrap_or(0.0);

        let mut sources = self.sources;
        for source in sources.iter_mut() {
            if let Some(m) = multiplier {
                source.temporal_multiplier = m;
            }
            if !(source.base_concentration > 0.0) || !(source.temporal_multiplier > 0.0) {
                return Err(TidewatchError::ConfigError(format!(
                    "Source '{}' needs a positive base concentration and temporal multiplier",
                    source.source_id
                )));
            }
        }

        if let Some(slot) = &self.time_slot {
            log::debug!(
                "Field estimator using time slot '{}' (x{}, wind {} km/h from {}°)",
                slot.label,
                slot.multiplier,
                slot.wind_speed,
                slot.wind_direction_deg
            );
        }

        Ok(FieldEstimator {
            sources,
            zones: self.zones,
            zone_level,
            zone_multiplier: multiplier.unwrap_or(1.0),
            wind_speed,
            background_range: (bg_min, bg_max),
            cutoff_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewatch_schemas::{environment::GeoPoint, zone::ZoneLevels};

    fn source(multiplier: f64) -> PointSource {
        PointSource {
            source_id: "la-garde".to_string(),
            name: "Station LA GARDE".to_string(),
            location: GeoPoint::new(43.088933513, 5.986681139241),
            sea_outlet: None,
            base_concentration: 3.2,
            level: ConcentrationLevel::Medium,
            temporal_multiplier: multiplier,
            pollutants: vec![],
        }
    }

    fn december() -> TimeSlot {
        TimeSlot {
            slot_id: "2024-12".to_string(),
            label: "Décembre 2024".to_string(),
            multiplier: 1.6,
            wind_direction_deg: 225.0,
            wind_speed: 22.0,
            concentration_level: ConcentrationLevel::High,
        }
    }

    #[test]
    fn time_slot_overrides_source_multipliers() {
        let estimator = FieldEstimatorBuilder::new()
            .with_time_slot(december())
            .with_sources(vec![source(0.3)])
            .build()
            .unwrap();
        assert_eq!(estimator.sources()[0].temporal_multiplier, 1.6);
        assert_eq!(estimator.wind_speed(), 22.0);
    }

    #[test]
    fn explicit_wind_speed_wins_over_slot() {
        let estimator = FieldEstimatorBuilder::new()
            .with_wind_speed(5.0)
            .with_time_slot(december())
            .build()
            .unwrap();
        assert_eq!(estimator.wind_speed(), 5.0);
    }

    #[test]
    fn rejects_reversed_background_range() {
        let err = FieldEstimatorBuilder::new()
            .with_background_range(0.003, 0.001)
            .build()
            .unwrap_err();
        assert!(matches!(err, TidewatchError::InvalidBackgroundRange(_, _)));
    }

    #[test]
    fn rejects_zero_multiplier_source() {
        let err = FieldEstimatorBuilder::new()
            .with_sources(vec![source(0.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, TidewatchError::ConfigError(_)));
    }

    #[test]
    fn rejects_undefined_zone_level() {
        let zone = PollutionZone {
            zone_id: "port-militaire".to_string(),
            name: "Arsenal de Toulon".to_string(),
            center: GeoPoint::new(43.1167, 5.9289),
            radius_m: 2000.0,
            levels: ZoneLevels { low: 2.1, medium: 3.8, high: 4.5 },
        };
        let err = FieldEstimatorBuilder::new()
            .with_zones(vec![zone])
            .with_zone_level(ConcentrationLevel::Critical)
            .build()
            .unwrap_err();
        assert!(matches!(err, TidewatchError::ConfigError(_)));
    }
}
