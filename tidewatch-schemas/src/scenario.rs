use crate::source::ConcentrationLevel;
use serde::{Deserialize, Serialize};

/// A time period with its own emission scaling and weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: String,
    pub label: String,
    /// Applied to every source as its temporal multiplier.
    pub multiplier: f64,
    pub wind_direction_deg: f64,
    /// Wind speed (km/h) used by the field estimator's wind effect.
    pub wind_speed: f64,
    pub concentration_level: ConcentrationLevel,
}
