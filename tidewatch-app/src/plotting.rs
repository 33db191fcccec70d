//! This module is responsible for generating all visualizations from prediction output.

use anyhow::Result;
use plotters::prelude::*;
use tidewatch_core::{
    analysis,
    field::{estimator::FieldEstimator, scan::GridBounds},
};
use tidewatch_schemas::{prediction::RiskCategory, request::TransectPoint};

fn risk_color(category: RiskCategory) -> RGBColor {
    match category {
        RiskCategory::Low => RGBColor(16, 185, 129),
        RiskCategory::LowMedium => RGBColor(132, 204, 22),
        RiskCategory::Medium => RGBColor(245, 158, 11),
        RiskCategory::High => RGBColor(234, 88, 12),
        RiskCategory::Critical => RGBColor(220, 38, 38),
    }
}

/// Plots concentration against distance with the toxic threshold overlaid.
pub fn plot_transect(output_dir: &str, points: &[TransectPoint], threshold: f64) -> Result<()> {
    if points.is_empty() {
        log::warn!("[Plotting] No transect points to plot.");
        return Ok(());
    }

    let path = format!("{}/transect.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_distance = points
        .iter()
        .map(|p| p.prediction.distance)
        .fold(0.0, f64::max)
        .max(1.0);
    let max_concentration = points
        .iter()
        .map(|p| p.prediction.prediction.predicted_concentration)
        .fold(threshold, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted Concentration by Distance", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_distance * 1.05, 0f64..max_concentration * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Distance from source (km)")
        .y_desc("Concentration")
        .draw()?;

    let mut sorted: Vec<&TransectPoint> = points.iter().collect();
    sorted.sort_by(|a, b| a.prediction.distance.total_cmp(&b.prediction.distance));

    chart
        .draw_series(LineSeries::new(
            sorted
                .iter()
                .map(|p| (p.prediction.distance, p.prediction.prediction.predicted_concentration)),
            BLUE.stroke_width(2),
        ))?
        .label("Predicted concentration")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));

    chart.draw_series(sorted.iter().map(|p| {
        Circle::new(
            (p.prediction.distance, p.prediction.prediction.predicted_concentration),
            6,
            risk_color(p.risk_assessment.risk_category).filled(),
        )
    }))?;

    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, threshold), (max_distance * 1.05, threshold)],
            8,
            6,
            RED.stroke_width(2),
        ))?
        .label("Toxic threshold")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    log::info!("[Plotting] Transect plot saved to '{}'.", path);
    Ok(())
}

/// Renders a scan log as a heatmap (log-scaled colour) with the effective
/// emission points of every source marked.
pub fn plot_concentration_grid(
    output_dir: &str,
    log_path: &str,
    bounds: &GridBounds,
    rows: usize,
    cols: usize,
    estimator: &FieldEstimator,
) -> Result<()> {
    let cells = analysis::read_scan_log(log_path)?;
    if cells.is_empty() {
        log::warn!("[Plotting] Warning: No data to plot.");
        return Ok(());
    }

    let path = format!("{}/concentration_grid.png", output_dir);
    let root = BitMapBackend::new(&path, (1280, 960)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Concentration Field", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(bounds.west..bounds.east, bounds.south..bounds.north)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()?;

    let (min_c, max_c) = cells.iter().fold((f64::INFINITY, 0.0f64), |(lo, hi), c| {
        (lo.min(c.total_concentration), hi.max(c.total_concentration))
    });
    let (log_min, log_max) = (min_c.max(1e-6).log10(), max_c.max(1e-6).log10());
    let span = (log_max - log_min).max(1e-9);

    let half_lat = (bounds.north - bounds.south) / rows as f64 / 2.0;
    let half_lng = (bounds.east - bounds.west) / cols as f64 / 2.0;

    chart.draw_series(cells.iter().map(|cell| {
        let t = ((cell.total_concentration.max(1e-6).log10() - log_min) / span).clamp(0.0, 1.0);
        // blue for background, red for the hottest cell
        let color = HSLColor(0.66 * (1.0 - t), 0.85, 0.5);
        Rectangle::new(
            [
                (cell.lng - half_lng, cell.lat - half_lat),
                (cell.lng + half_lng, cell.lat + half_lat),
            ],
            color.filled(),
        )
    }))?;

    chart.draw_series(estimator.sources().iter().map(|source| {
        let at = source.effective_location();
        EmptyElement::at((at.lng, at.lat))
            + Circle::new((0, 0), 6, BLACK.filled())
            + Text::new(source.name.clone(), (8, -8), ("sans-serif", 14).into_font())
    }))?;

    root.present()?;
    log::info!(
        "[Plotting] Heatmap saved to '{}' (range {:.6} to {:.6}).",
        path,
        min_c,
        max_c
    );
    Ok(())
}
