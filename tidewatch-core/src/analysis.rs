use crate::{error::TidewatchError, field::scan::ScanCell};
use std::collections::{BTreeMap, HashMap};
use tidewatch_schemas::{environment::GeoPoint, prediction::RiskCategory};

#[derive(Debug, Default, Clone)]
pub struct ScanSummary {
    pub cells: usize,
    pub max_concentration: f64,
    pub max_location: Option<GeoPoint>,
    pub mean_concentration: f64,
    pub cells_by_category: BTreeMap<RiskCategory, usize>,
    pub dominant_sources: HashMap<String, usize>,
}

impl ScanSummary {
    /// Cells whose total concentration exceeds the threshold.
    pub fn critical_cells(&self) -> usize {
        self.cells_by_category
            .get(&RiskCategory::Critical)
            .copied()
            .unwrap_or(0)
    }
}

pub fn read_scan_log(log_path: &str) -> Result<Vec<ScanCell>, TidewatchError> {
    let mut reader = csv::Reader::from_path(log_path)
        .map_err(|e| TidewatchError::CsvError(log_path.to_string(), e))?;
    let mut cells = Vec::new();
    for result in reader.deserialize() {
        let cell: ScanCell = result.map_err(|e| TidewatchError::CsvError(log_path.to_string(), e))?;
        cells.push(cell);
    }
    Ok(cells)
}

pub fn summarize_scan(cells: &[ScanCell]) -> ScanSummary {
    let mut summary = ScanSummary::default();
    let mut sum = 0.0;

    for cell in cells {
        summary.cells += 1;
        sum += cell.total_concentration;
        if summary.max_location.is_none() || cell.total_concentration > summary.max_concentration {
            summary.max_concentration = cell.total_concentration;
            summary.max_location = Some(GeoPoint::new(cell.lat, cell.lng));
        }
        *summary.cells_by_category.entry(cell.risk_category).or_insert(0) += 1;
        *summary
            .dominant_sources
            .entry(cell.dominant_source.clone())
            .or_insert(0) += 1;
    }

    if summary.cells > 0 {
        summary.mean_concentration = sum / summary.cells as f64;
    }
    summary
}

/// Reads a scan log written by `ScanLogger` and summarises it.
pub fn summarize_scan_log(log_path: &str) -> Result<ScanSummary, TidewatchError> {
    let cells = read_scan_log(log_path)?;
    Ok(summarize_scan(&cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ScanLogger;

    fn cell(row: usize, total: f64, source: &str, category: RiskCategory) -> ScanCell {
        ScanCell {
            row,
            col: 0,
            lat: 43.0 + row as f64 * 0.01,
            lng: 5.9,
            total_concentration: total,
            dominant_source: source.to_string(),
            influence_count: 1,
            risk_level: category.level(),
            risk_category: category,
        }
    }

    #[test]
    fn summary_tracks_max_mean_and_counts() {
        let cells = vec![
            cell(0, 0.5, "Station ALMANARRE", RiskCategory::LowMedium),
            cell(1, 2.5, "Station ALMANARRE", RiskCategory::Critical),
            cell(2, 0.002, "Natural background", RiskCategory::Low),
        ];
        let summary = summarize_scan(&cells);
        assert_eq!(summary.cells, 3);
        assert_eq!(summary.max_concentration, 2.5);
        assert_eq!(summary.max_location, Some(GeoPoint::new(43.01, 5.9)));
        assert!((summary.mean_concentration - 3.002 / 3.0).abs() < 1e-12);
        assert_eq!(summary.critical_cells(), 1);
        assert_eq!(summary.dominant_sources["Station ALMANARRE"], 2);
    }

    #[test]
    fn empty_scan_has_no_max() {
        let summary = summarize_scan(&[]);
        assert_eq!(summary.cells, 0);
        assert!(summary.max_location.is_none());
        assert_eq!(summary.mean_concentration, 0.0);
    }

    #[test]
    fn log_round_trips_through_csv() {
        let path = std::env::temp_dir().join(format!("tidewatch_scan_{}.csv", std::process::id()));
        let path = path.to_str().unwrap().to_string();
        let mut logger = ScanLogger::new(&path).unwrap();
        logger.log_cell(&cell(0, 1.2, "Station LA GARDE PONT DE LA CLUE", RiskCategory::LowMedium)).unwrap();
        logger.log_cell(&cell(1, 0.001, "Natural background", RiskCategory::Low)).unwrap();
        logger.finish().unwrap();

        let cells = read_scan_log(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].risk_category, RiskCategory::LowMedium);
        assert_eq!(cells[0].dominant_source, "Station LA GARDE PONT DE LA CLUE");
    }
}
