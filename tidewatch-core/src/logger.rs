use crate::{error::TidewatchError, field::scan::ScanCell};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use tidewatch_schemas::{prediction::RiskCategory, request::TransectPoint};

#[derive(Debug, Serialize, Deserialize)]
pub struct TransectRecord {
    pub distance_km: f64,
    pub predicted_concentration: f64,
    pub confidence: f64,
    pub distance_factor: f64,
    pub temperature_factor: f64,
    pub hydrodynamics_factor: f64,
    pub chemical_factor: f64,
    pub risk_level: u8,
    pub risk_category: RiskCategory,
    pub exceeds_threshold: bool,
    pub safety_margin: f64,
}

impl From<&TransectPoint> for TransectRecord {
    fn from(point: &TransectPoint) -> Self {
        let p = &point.prediction.prediction;
        let r = &point.risk_assessment;
        Self {
            distance_km: point.prediction.distance,
            predicted_concentration: p.predicted_concentration,
            confidence: p.confidence,
            distance_factor: p.factors.distance,
            temperature_factor: p.factors.temperature,
            hydrodynamics_factor: p.factors.hydrodynamics,
            chemical_factor: p.factors.chemical,
            risk_level: r.risk_level,
            risk_category: r.risk_category,
            exceeds_threshold: r.exceeds_threshold,
            safety_margin: r.safety_margin,
        }
    }
}

fn create_writer(path: &str) -> Result<Writer<fs::File>, TidewatchError> {
    let file = fs::File::create(path).map_err(|e| TidewatchError::FileIO(path.to_string(), e))?;
    Ok(Writer::from_writer(file))
}

/// Writes transect predictions to CSV, one row per distance.
pub struct TransectLogger {
    path: String,
    writer: Writer<fs::File>,
}

impl TransectLogger {
    pub fn new(path: &str) -> Result<Self, TidewatchError> {
        let writer = create_writer(path)?;
        Ok(Self { path: path.to_string(), writer })
    }

    pub fn log_point(&mut self, point: &TransectPoint) -> Result<(), TidewatchError> {
        self.writer
            .serialize(TransectRecord::from(point))
            .map_err(|e| TidewatchError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| TidewatchError::FileIO(self.path.clone(), e))
    }
}

/// Writes grid scan cells to CSV as they are evaluated.
pub struct ScanLogger {
    path: String,
    writer: Writer<fs::File>,
}

impl ScanLogger {
    pub fn new(path: &str) -> Result<Self, TidewatchError> {
        let writer = create_writer(path)?;
        Ok(Self { path: path.to_string(), writer })
    }

    pub fn log_cell(&mut self, cell: &ScanCell) -> Result<(), TidewatchError> {
        self.writer
            .serialize(cell)
            .map_err(|e| TidewatchError::CsvError(self.path.clone(), e))
    }

    pub fn finish(mut self) -> Result<(), TidewatchError> {
        self.writer
            .flush()
            .map_err(|e| TidewatchError::FileIO(self.path, e))
    }
}
