use crate::{environment::GeoPoint, source::ConcentrationLevel};
use serde::{Deserialize, Serialize};

/// Measured concentration of a zone under each scenario level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLevels {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl ZoneLevels {
    /// Returns `None` for levels a zone does not define (`natural`, `critical`).
    pub fn get(&self, level: ConcentrationLevel) -> Option<f64> {
        match level {
            ConcentrationLevel::Low => Some(self.low),
            ConcentrationLevel::Medium => Some(self.medium),
            ConcentrationLevel::High => Some(self.high),
            ConcentrationLevel::Natural | ConcentrationLevel::Critical => None,
        }
    }
}

/// An area of diffuse contamination (e.g. a harbour) around a centre point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionZone {
    pub zone_id: String,
    pub name: String,
    pub center: GeoPoint,
    pub radius_m: f64,
    pub levels: ZoneLevels,
}
