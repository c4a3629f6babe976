//! Tukey-fence outlier detection.

/// Values below `lower` or above `upper` are outliers. NaN bounds (from an
/// empty sample) flag nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

const FENCE: f64 = 1.5;

impl OutlierBounds {
    pub fn from_values(values: &[f64]) -> Self {
        let (lower, upper) = bounds(values);
        Self { lower, upper }
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// `(Q1 - 1.5 * IQR, Q3 + 1.5 * IQR)` over the non-NaN values.
pub fn bounds(values: &[f64]) -> (f64, f64) {
    let q1 = quantile(values, 0.25);
    let q3 = quantile(values, 0.75);
    let iqr = q3 - q1;
    (q1 - FENCE * iqr, q3 + FENCE * iqr)
}

/// Linear interpolation between the two closest ranks, skipping NaN.
/// Returns NaN when no value is left.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Overwrites every flagged value with `replacement` and returns how many
/// were replaced. Nulls are left alone.
pub fn replace_outliers(
    values: &mut [Option<f64>],
    bounds: OutlierBounds,
    replacement: Option<f64>,
) -> usize {
    let mut replaced = 0;
    for slot in values.iter_mut() {
        if let Some(value) = *slot {
            if bounds.is_outlier(value) {
                *slot = replacement;
                replaced += 1;
            }
        }
    }
    replaced
}
