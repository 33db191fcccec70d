use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic decomposition of a prediction. Each factor is roughly in `[0, 1]`
/// and is never fed back into the concentration formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub distance: f64,
    pub temperature: f64,
    pub hydrodynamics: f64,
    pub chemical: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_concentration: f64,
    pub confidence: f64,
    pub factors: FactorBreakdown,
}

/// A prediction tagged with the distance (km) it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistancePrediction {
    pub distance: f64,
    #[serde(flatten)]
    pub prediction: PredictionResult,
}

/// The five risk bands, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// Numeric level from 1 (Low) to 5 (Critical).
    pub fn level(self) -> u8 {
        match self {
            RiskCategory::Low => 1,
            RiskCategory::LowMedium => 2,
            RiskCategory::Medium => 3,
            RiskCategory::High => 4,
            RiskCategory::Critical => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::LowMedium => "Low-Medium",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: u8,
    pub risk_category: RiskCategory,
    pub exceeds_threshold: bool,
    /// `max(0, 1 - concentration / threshold)`.
    pub safety_margin: f64,
}
