//! Validation boundary between raw prediction requests and the model.
//!
//! Required fields must be present and finite; optional fields fall back to
//! the defaults below. The model itself never sees a partial vector.

use crate::{
    error::TidewatchError,
    model::{check_domain, DiffusionModel},
};
use tidewatch_schemas::{
    environment::{BaseConditions, EnvironmentalVector},
    request::{PredictionRequest, PredictionResponse, TransectPoint},
};

pub const DEFAULT_SALINITY_PSU: f64 = 35.0;
pub const DEFAULT_CURRENT_SPEED: f64 = 0.5;
pub const DEFAULT_WIND_SPEED: f64 = 10.0;
pub const DEFAULT_DEPTH_M: f64 = 5.0;
pub const DEFAULT_TRANSECT_DISTANCES_KM: [f64; 3] = [5.0, 10.0, 25.0];
pub const DEFAULT_TOXIC_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub input: EnvironmentalVector,
    pub toxic_threshold: Option<f64>,
}

fn required(value: Option<f64>, name: &'static str) -> Result<f64, TidewatchError> {
    let v = value.ok_or(TidewatchError::MissingField(name))?;
    finite(v, name)
}

fn optional(value: Option<f64>, default: f64, name: &'static str) -> Result<f64, TidewatchError> {
    finite(value.unwrap_or(default), name)
}

fn finite(v: f64, name: &'static str) -> Result<f64, TidewatchError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TidewatchError::NonFiniteField(name))
    }
}

/// Checks required fields and fills in defaults for the optional ones.
///
/// Physically implausible values are logged as warnings and passed through.
pub fn validate_request(request: &PredictionRequest) -> Result<ValidatedRequest, TidewatchError> {
    let input = EnvironmentalVector {
        source_concentration: required(request.source_concentration, "sourceConcentration")?,
        distance: required(request.distance, "distance")?,
        temperature: required(request.temperature, "temperature")?,
        ph: required(request.ph, "pH")?,
        salinity: optional(request.salinity, DEFAULT_SALINITY_PSU, "salinity")?,
        current_speed: optional(request.current_speed, DEFAULT_CURRENT_SPEED, "currentSpeed")?,
        wind_speed: optional(request.wind_speed, DEFAULT_WIND_SPEED, "windSpeed")?,
        depth: optional(request.depth, DEFAULT_DEPTH_M, "depth")?,
    };

    let toxic_threshold = match request.toxic_threshold {
        Some(t) => {
            let t = finite(t, "toxicThreshold")?;
            if t <= 0.0 {
                return Err(TidewatchError::InvalidThreshold(t));
            }
            Some(t)
        }
        None => None,
    };

    for warning in check_domain(&input) {
        log::warn!("Evaluating out-of-range input: {:?}", warning);
    }

    Ok(ValidatedRequest { input, toxic_threshold })
}

/// Validates and evaluates a request; risk is assessed only when a threshold
/// is supplied.
pub fn evaluate_request(
    model: &DiffusionModel,
    request: &PredictionRequest,
) -> Result<PredictionResponse, TidewatchError> {
    let validated = validate_request(request)?;
    let prediction = model.predict(&validated.input);
    let risk_assessment = validated
        .toxic_threshold
        .map(|threshold| model.assess_risk(&prediction, threshold));
    Ok(PredictionResponse {
        prediction,
        risk_assessment,
    })
}

/// Predicts along a transect of distances (km) from the request's conditions,
/// assessing each point against `toxic_threshold`, the request's threshold, or
/// the default of 10 in that order. The request's own distance is ignored.
pub fn evaluate_transect(
    model: &DiffusionModel,
    request: &PredictionRequest,
    distances: &[f64],
    toxic_threshold: Option<f64>,
) -> Result<Vec<TransectPoint>, TidewatchError> {
    let request = PredictionRequest {
        distance: request.distance.or(Some(0.0)),
        toxic_threshold: toxic_threshold.or(request.toxic_threshold),
        ..request.clone()
    };
    let validated = validate_request(&request)?;
    let threshold = validated.toxic_threshold.unwrap_or(DEFAULT_TOXIC_THRESHOLD);
    for (i, d) in distances.iter().enumerate() {
        if !d.is_finite() {
            log::warn!("Transect distance #{} is not finite", i);
            return Err(TidewatchError::NonFiniteField("distances"));
        }
    }

    let base = BaseConditions::from(validated.input);
    Ok(model
        .predict_multiple_distances(&base, distances)
        .into_iter()
        .map(|prediction| TransectPoint {
            risk_assessment: model.assess_risk(&prediction.prediction, threshold),
            prediction,
        })
        .collect())
}
