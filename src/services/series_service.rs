use crate::api::myfinstocks::{number_or_zero, Summary};
use crate::models::{PricePoint, TrendRow};

/// Labels of the derived series, oldest first
pub const SUMMARY_LABELS: [&str; 4] = ["1y ago", "30d ago", "yesterday", "today"];

/// Build the 4-point trend from a price summary.
///
/// Order is fixed: 1y ago, 30d ago, yesterday, today. Missing prices
/// become 0 and numeric text is parsed.
pub fn series_from_summary(summary: &Summary) -> Vec<PricePoint> {
    let values = [
        &summary.price_1y_ago,
        &summary.price_30d_ago,
        &summary.yesterday_price,
        &summary.live_price,
    ];

    SUMMARY_LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| PricePoint::new(*label, number_or_zero(value)))
        .collect()
}

/// Change of the last point relative to each earlier point
pub fn trend_rows(series: &[PricePoint]) -> Vec<TrendRow> {
    let Some((latest, earlier)) = series.split_last() else {
        return Vec::new();
    };

    earlier
        .iter()
        .map(|point| TrendRow {
            label: point.label.clone(),
            reference: point.value,
            change_pct: percent_change(point.value, latest.value),
        })
        .collect()
}

fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}
