//! Descriptive statistics over expense amounts

use crate::models::ExpenseStats;

/// Summarize amounts: count, min, max, mean and interpolated median.
///
/// An empty slice yields all zeros.
pub fn describe(amounts: &[f64]) -> ExpenseStats {
    if amounts.is_empty() {
        return ExpenseStats::default();
    }

    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();

    ExpenseStats {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        avg: sum / count as f64,
        median: percentile(&sorted, 50.0),
    }
}

/// Linear-interpolated percentile of an ascending slice
///
/// `p` is in 0..=100. Uses rank `p/100 * (n - 1)` and interpolates between
/// the neighbouring order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }

    let rank = (p / 100.0) * (sorted.len() as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let w = rank - lower as f64;
        sorted[lower] * (1.0 - w) + sorted[upper] * w
    }
}
