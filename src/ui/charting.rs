/// Chart points for hit offsets: x is the hit number (1-based), y the
/// signed offset in ms.
pub fn offset_points(offsets: &[i64]) -> Vec<(f64, f64)> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &o)| ((i + 1) as f64, o as f64))
        .collect()
}

/// X upper bound (number of hits, at least 1) and symmetric Y bound (largest
/// absolute offset rounded up to the next 50ms, at least 50).
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let widest = points.iter().fold(0.0_f64, |acc, &(_, y)| acc.max(y.abs()));
    let y_bound = ((widest / 50.0).ceil() * 50.0).max(50.0);
    let x_bound = points.last().map(|p| p.0).unwrap_or(1.0).max(1.0);
    (x_bound, y_bound)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
