use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::PricePoint;

/// Fixed chart size in pixels
pub const CHART_WIDTH: u32 = 900;
pub const CHART_HEIGHT: u32 = 320;

/// Most x-axis labels drawn before they start to overlap
const MAX_X_LABELS: usize = 8;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Not enough price data to draw a chart ({0} point(s), minimum 2 required)")]
    NotEnoughData(usize),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

/// Y-axis range for `points`: padded by 10% of the span, never below zero
pub fn price_bounds(points: &[PricePoint]) -> (f64, f64) {
    let min_price = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max_price = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);

    let price_range = (max_price - min_price).max(1e-8);
    let padding = price_range * 0.1;
    ((min_price - padding).max(0.0), max_price + padding)
}

/// Whether axis text is drawn. Text needs a system font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartText {
    Labelled,
    Plain,
}

/// Render `points` as a line chart PNG at `path`.
///
/// The x axis is categorical: one slot per point, labelled with the point label.
/// If the caption or axis labels cannot be drawn (no usable font on the
/// host), the chart is drawn again without any text at the same size.
pub fn render_chart(
    path: &Path,
    title: &str,
    points: &[PricePoint],
    width: u32,
    height: u32,
) -> Result<(), ChartError> {
    if points.len() < 2 {
        return Err(ChartError::NotEnoughData(points.len()));
    }

    match draw_png(path, title, points, (width, height), ChartText::Labelled) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("Labelled chart failed ({}), drawing without text", e);
            draw_png(path, title, points, (width, height), ChartText::Plain)
        }
    }
}

fn draw_png(
    path: &Path,
    title: &str,
    points: &[PricePoint],
    size: (u32, u32),
    text: ChartText,
) -> Result<(), ChartError> {
    let (y_min, y_max) = price_bounds(points);
    let last_index = (points.len() - 1) as u32;
    debug!(
        "Drawing {} points to {} ({}x{}, {:?}), y in [{:.2}, {:.2}]",
        points.len(),
        path.display(),
        size.0,
        size.1,
        text,
        y_min,
        y_max
    );

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Drawing(format!("fill canvas: {}", e)))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if text == ChartText::Labelled {
        builder
            .caption(title, ("sans-serif", 24.0).into_font())
            .x_label_area_size(40)
            .y_label_area_size(60);
    }
    let mut chart = builder
        .build_cartesian_2d(0u32..last_index, y_min..y_max)
        .map_err(|e| ChartError::Drawing(format!("build chart: {}", e)))?;

    if text == ChartText::Labelled {
        let x_label = |x: &u32| {
            points
                .get(*x as usize)
                .map(|p| p.label.clone())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(points.len().min(MAX_X_LABELS))
            .x_label_formatter(&x_label)
            .y_desc("Price")
            .draw()
            .map_err(|e| ChartError::Drawing(format!("draw mesh: {}", e)))?;
    }

    chart
        .draw_series(LineSeries::new(
            points.iter().enumerate().map(|(i, p)| (i as u32, p.value)),
            &BLUE,
        ))
        .map_err(|e| ChartError::Drawing(format!("draw line: {}", e)))?;

    chart
        .draw_series(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| Circle::new((i as u32, p.value), 3, BLUE.filled())),
        )
        .map_err(|e| ChartError::Drawing(format!("draw points: {}", e)))?;

    root.present()
        .map_err(|e| ChartError::Drawing(format!("write {}: {}", path.display(), e)))?;

    Ok(())
}
