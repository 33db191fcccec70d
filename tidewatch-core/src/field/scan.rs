use super::estimator::FieldEstimator;
use crate::{error::TidewatchError, model::classify_concentration};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tidewatch_schemas::{environment::GeoPoint, prediction::RiskCategory};

/// A lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GridBounds {
    /// Centre of cell `(row, col)` in a `rows x cols` grid, row 0 at the south edge.
    pub fn cell_center(&self, row: usize, col: usize, rows: usize, cols: usize) -> GeoPoint {
        let d_lat = (self.north - self.south) / rows as f64;
        let d_lng = (self.east - self.west) / cols as f64;
        GeoPoint::new(
            self.south + (row as f64 + 0.5) * d_lat,
            self.west + (col as f64 + 0.5) * d_lng,
        )
    }
}

/// One evaluated grid cell. Flat so it can be written straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCell {
    pub row: usize,
    pub col: usize,
    pub lat: f64,
    pub lng: f64,
    pub total_concentration: f64,
    pub dominant_source: String,
    pub influence_count: usize,
    pub risk_level: u8,
    pub risk_category: RiskCategory,
}

/// Upper bound on `rows * cols` for a single scan.
pub const MAX_SCAN_CELLS: usize = 1_000_000;

/// Evaluates the field at every cell centre, row-major from the south-west.
///
/// # Errors
///
/// Returns a `TidewatchError` for an empty or oversized grid, inverted
/// bounds, or a non-positive threshold.
pub fn scan_grid<R: Rng + ?Sized>(
    estimator: &FieldEstimator,
    bounds: &GridBounds,
    rows: usize,
    cols: usize,
    toxic_threshold: f64,
    rng: &mut R,
) -> Result<Vec<ScanCell>, TidewatchError> {
    if rows == 0 || cols == 0 {
        return Err(TidewatchError::ConfigError("Grid needs at least one row and column".to_string()));
    }
    if !(bounds.north > bounds.south && bounds.east > bounds.west) {
        return Err(TidewatchError::ConfigError(format!(
            "Grid bounds are inverted: {:?}",
            bounds
        )));
    }
    if !(toxic_threshold > 0.0) {
        return Err(TidewatchError::InvalidThreshold(toxic_threshold));
    }

    let cell_count = rows
        .checked_mul(cols)
        .filter(|&n| n <= MAX_SCAN_CELLS)
        .ok_or_else(|| {
            TidewatchError::ConfigError(format!(
                "Grid of {} x {} cells exceeds the limit of {}",
                rows, cols, MAX_SCAN_CELLS
            ))
        })?;

    let mut cells = Vec::with_capacity(cell_count);
    for row in 0..rows {
        for col in 0..cols {
            let point = bounds.cell_center(row, col, rows, cols);
            let field = estimator.predict_at(point, rng);
            let risk = classify_concentration(field.total_concentration, toxic_threshold);
            cells.push(ScanCell {
                row,
                col,
                lat: point.lat,
                lng: point.lng,
                total_concentration: field.total_concentration,
                dominant_source: field.dominant_source().unwrap_or_default().to_string(),
                influence_count: field.influences.len(),
                risk_level: risk.risk_level,
                risk_category: risk.risk_category,
            });
        }
    }
    log::info!("Scanned {} cells ({} x {})", cells.len(), rows, cols);
    Ok(cells)
}
