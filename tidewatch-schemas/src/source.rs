//! Point sources of contamination, such as treatment-plant outfalls.

use crate::environment::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical concentration tag carried by sources, zones and influences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    Natural,
    Low,
    Medium,
    High,
    Critical,
}

impl ConcentrationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConcentrationLevel::Natural => "natural",
            ConcentrationLevel::Low => "low",
            ConcentrationLevel::Medium => "medium",
            ConcentrationLevel::High => "high",
            ConcentrationLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

fn default_temporal_multiplier() -> f64 {
    1.0
}

/// A fixed point of contaminant origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    pub source_id: String,
    pub name: String,
    /// Discharge point.
    pub location: GeoPoint,
    /// Where a river-routed discharge actually reaches the sea, if elsewhere.
    #[serde(default)]
    pub sea_outlet: Option<GeoPoint>,
    pub base_concentration: f64,
    /// Informational only; surfaced on every influence this source produces.
    pub level: ConcentrationLevel,
    #[serde(default = "default_temporal_multiplier")]
    pub temporal_multiplier: f64,
    #[serde(default)]
    pub pollutants: Vec<String>,
}

impl PointSource {
    /// The location contaminant is emitted from: the sea outlet when the
    /// discharge is routed down a river, otherwise the discharge point.
    pub fn effective_location(&self) -> GeoPoint {
        self.sea_outlet.unwrap_or(self.location)
    }

    /// `base_concentration * temporal_multiplier`.
    pub fn base_influence(&self) -> f64 {
        self.base_concentration * self.temporal_multiplier
    }
}
