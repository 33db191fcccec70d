//! The JSON contract for single-point predictions. Every field is optional on
//! the wire so that missing values can be reported instead of failing to parse.

use crate::prediction::{DistancePrediction, PredictionResult, RiskAssessment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub source_concentration: Option<f64>,
    pub distance: Option<f64>,
    pub temperature: Option<f64>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
    pub salinity: Option<f64>,
    pub current_speed: Option<f64>,
    pub wind_speed: Option<f64>,
    pub depth: Option<f64>,
    pub toxic_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub prediction: PredictionResult,
    pub risk_assessment: Option<RiskAssessment>,
}

/// One row of a multi-distance transect with its risk band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransectPoint {
    #[serde(flatten)]
    pub prediction: DistancePrediction,
    pub risk_assessment: RiskAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_request_with_missing_fields() {
        let body = r#"{"sourceConcentration":5.0,"distance":10,"pH":7.5,"toxicThreshold":10}"#;
        let request: PredictionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.source_concentration, Some(5.0));
        assert_eq!(request.distance, Some(10.0));
        assert_eq!(request.ph, Some(7.5));
        assert_eq!(request.temperature, None);
        assert_eq!(request.toxic_threshold, Some(10.0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let body = r#"{"sourceConcentration":"lots","distance":10}"#;
        assert!(serde_json::from_str::<PredictionRequest>(body).is_err());
    }
}
