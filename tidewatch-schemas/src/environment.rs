//! Defines the environmental inputs consumed by the diffusion model.
//! Units are fixed by the caller for concentrations; everything else is SI-ish
//! (km for distance, m/s for speeds, m for depth, PSU for salinity).

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The full environmental vector for a single point prediction.
///
/// Every field is required; the model applies no defaults of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalVector {
    /// Concentration at the source, in whatever unit the caller works in.
    pub source_concentration: f64,
    /// Distance from the source (km).
    pub distance: f64,
    /// Water temperature (°C).
    pub temperature: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Salinity (PSU). Carried for completeness, not used by the decay formula.
    pub salinity: f64,
    /// Current speed (m/s).
    pub current_speed: f64,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Depth below the surface (m).
    pub depth: f64,
}

/// An environmental vector without a distance, used for transect predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseConditions {
    pub source_concentration: f64,
    pub temperature: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub salinity: f64,
    pub current_speed: f64,
    pub wind_speed: f64,
    pub depth: f64,
}

impl BaseConditions {
    /// Completes the vector with the given distance (km).
    pub fn at_distance(&self, distance: f64) -> EnvironmentalVector {
        EnvironmentalVector {
            source_concentration: self.source_concentration,
            distance,
            temperature: self.temperature,
            ph: self.ph,
            salinity: self.salinity,
            current_speed: self.current_speed,
            wind_speed: self.wind_speed,
            depth: self.depth,
        }
    }
}

impl From<EnvironmentalVector> for BaseConditions {
    fn from(v: EnvironmentalVector) -> Self {
        Self {
            source_concentration: v.source_concentration,
            temperature: v.temperature,
            ph: v.ph,
            salinity: v.salinity,
            current_speed: v.current_speed,
            wind_speed: v.wind_speed,
            depth: v.depth,
        }
    }
}
