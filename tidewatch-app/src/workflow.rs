use crate::{config::KnowledgeBase, plotting, FieldArgs};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::{fs, path::Path};
use tidewatch_core::{
    analysis::{self, ScanSummary},
    field::{
        estimator::FieldEstimator,
        scan::{self, GridBounds},
        FieldEstimatorBuilder,
    },
    logger::{ScanLogger, TransectLogger},
    request::{self, DEFAULT_TRANSECT_DISTANCES_KM},
    DiffusionModel,
};
use tidewatch_schemas::{
    environment::GeoPoint,
    field::FieldPrediction,
    request::{PredictionRequest, TransectPoint},
};

fn read_request(path: &str) -> Result<PredictionRequest> {
    let body = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse prediction request {}", path))
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Evaluates one request and prints the JSON response to stdout.
pub fn run_predict(request_path: &str) -> Result<()> {
    let request = read_request(request_path)?;
    let response = request::evaluate_request(&DiffusionModel::new(), &request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Runs a transect from a request, logging, plotting and printing each point.
pub fn run_transect(
    request_path: &str,
    distances: Option<&[f64]>,
    threshold: Option<f64>,
    output_dir: &str,
) -> Result<()> {
    log::info!("--- [Workflow] Transect ---");
    let request = read_request(request_path)?;
    let distances = distances.unwrap_or(&DEFAULT_TRANSECT_DISTANCES_KM);
    let points = request::evaluate_transect(&DiffusionModel::new(), &request, distances, threshold)?;

    let log_path = Path::new(output_dir).join("transect.csv");
    let log_path = log_path.to_str().context("Output path is not valid UTF-8")?;
    let mut logger = TransectLogger::new(log_path)?;
    for point in &points {
        logger.log_point(point)?;
    }

    let json_path = Path::new(output_dir).join("transect.json");
    fs::write(&json_path, serde_json::to_string_pretty(&points)?)?;

    let threshold = threshold
        .or(request.toxic_threshold)
        .unwrap_or(request::DEFAULT_TOXIC_THRESHOLD);
    plotting::plot_transect(output_dir, &points, threshold)?;
    print_transect_report(&points, threshold);

    log::info!("Transect results are in '{}'", output_dir);
    Ok(())
}

fn build_estimator(kb: &KnowledgeBase, args: &FieldArgs) -> Result<FieldEstimator> {
    let mut builder = FieldEstimatorBuilder::new()
        .with_sources(kb.sources.values().cloned().collect())
        .with_zones(kb.zones.values().cloned().collect())
        .with_zone_level(args.zone_level);
    if let Some(slot) = kb.time_slot(args.slot.as_deref())? {
        log::info!("Using time slot '{}' ({})", slot.slot_id, slot.label);
        builder = builder.with_time_slot(slot.clone());
    }
    Ok(builder.build()?)
}

/// Superposes every source at one point and writes the result as JSON.
pub fn run_probe(kb: &KnowledgeBase, lat: f64, lng: f64, args: &FieldArgs, output_dir: &str) -> Result<()> {
    log::info!("--- [Workflow] Probe ({:.5}, {:.5}) ---", lat, lng);
    let estimator = build_estimator(kb, args)?;
    let mut rng = seeded_rng(args.seed);
    let field = estimator.predict_at(GeoPoint::new(lat, lng), &mut rng);

    fs::write(
        Path::new(output_dir).join("probe.json"),
        serde_json::to_string_pretty(&field)?,
    )?;
    print_probe_report(lat, lng, &field);
    Ok(())
}

/// Scans a grid, logs every cell to CSV, then summarises and plots the log.
pub fn run_scan(
    kb: &KnowledgeBase,
    bounds: &GridBounds,
    rows: usize,
    cols: usize,
    threshold: f64,
    args: &FieldArgs,
    output_dir: &str,
) -> Result<()> {
    log::info!("--- [Workflow] Grid scan {} x {} ---", rows, cols);
    let estimator = build_estimator(kb, args)?;
    let mut rng = seeded_rng(args.seed);
    let cells = scan::scan_grid(&estimator, bounds, rows, cols, threshold, &mut rng)?;

    let log_path = Path::new(output_dir).join("scan.csv");
    let log_path = log_path.to_str().context("Output path is not valid UTF-8")?;
    let mut logger = ScanLogger::new(log_path)?;
    for cell in &cells {
        logger.log_cell(cell)?;
    }
    logger.finish()?;

    let summary = analysis::summarize_scan_log(log_path)?;
    plotting::plot_concentration_grid(output_dir, log_path, bounds, rows, cols, &estimator)?;
    print_scan_report(&summary, threshold);
    log::info!("Scan results are in '{}'", output_dir);
    Ok(())
}

fn print_transect_report(points: &[TransectPoint], threshold: f64) {
    println!("\n--- [Transect Report] (toxic threshold {}) ---", threshold);
    println!("{:>10} | {:>14} | {:>10} | {:>6} | {:>6}", "Distance", "Concentration", "Risk", "Level", "Margin");
    println!("{}", "-".repeat(60));
    for p in points {
        println!(
            "{:>7.2} km | {:>14.4} | {:>10} | {:>6} | {:>5.1}%",
            p.prediction.distance,
            p.prediction.prediction.predicted_concentration,
            p.risk_assessment.risk_category,
            p.risk_assessment.risk_level,
            p.risk_assessment.safety_margin * 100.0
        );
    }
}

fn print_probe_report(lat: f64, lng: f64, field: &FieldPrediction) {
    println!("\n--- [Probe Report] ({:.5}, {:.5}) ---", lat, lng);
    println!("Total concentration: {:.6}", field.total_concentration);
    for influence in &field.influences {
        println!(
            "  - {:<40} {:>8.0} m | {:>10.6} | {:<8} | {:>6.1}%",
            influence.source,
            influence.distance_m,
            influence.influence,
            influence.level,
            influence.contribution
        );
    }
}

fn print_scan_report(summary: &ScanSummary, threshold: f64) {
    println!("\n--- [Scan Summary] ---");
    println!("========================================");
    println!("Cells evaluated:      {}", summary.cells);
    println!("Mean concentration:   {:.6}", summary.mean_concentration);
    if let Some(at) = summary.max_location {
        println!(
            "Peak concentration:   {:.6} at ({:.5}, {:.5})",
            summary.max_concentration, at.lat, at.lng
        );
    }
    println!("Cells above threshold ({}): {}", threshold, summary.critical_cells());
    println!("\nCells by risk category:");
    for (category, count) in &summary.cells_by_category {
        println!("  - {:<10} {}", category, count);
    }
    println!("\nDominant source by cell count:");
    let mut dominant: Vec<_> = summary.dominant_sources.iter().collect();
    dominant.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (source, count) in dominant {
        println!("  - {:<40} {}", source, count);
    }
    println!("========================================");
}
