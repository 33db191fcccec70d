use crate::source::ConcentrationLevel;
use serde::{Deserialize, Serialize};

/// One contributor's share of the concentration at a queried point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influence {
    pub source: String,
    /// Distance to the contributor, rounded to the metre.
    #[serde(rename = "distance")]
    pub distance_m: f64,
    pub influence: f64,
    pub level: ConcentrationLevel,
    /// Percentage of the contributor's base output reaching the point.
    pub contribution: f64,
}

/// The superposed concentration at a point, influences sorted strongest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPrediction {
    pub total_concentration: f64,
    pub influences: Vec<Influence>,
}

impl FieldPrediction {
    /// Name of the strongest contributor.
    pub fn dominant_source(&self) -> Option<&str> {
        self.influences.first().map(|i| i.source.as_str())
    }
}
