//! Moving-average recurrences over sliding windows.
//!
//! Windows are left-clamped at the series start: early bars use all
//! available history rather than being marked invalid. This is the
//! intended edge policy, not a bug.

use crate::config::AverageKind;

/// Effective `[start, end]` window for one index, left-clamped at 0.
/// `periods` must be >= 1 (validated by the indicator config).
#[inline]
pub fn check_range(index: usize, periods: usize) -> (usize, usize) {
    (index.saturating_sub(periods - 1), index)
}

/// Arithmetic mean over the clamped window ending at `index`.
pub fn sma_at(values: &[f64], index: usize, periods: usize) -> f64 {
    let (start, end) = check_range(index, periods);
    let window = &values[start..=end];
    window.iter().sum::<f64>() / window.len() as f64
}

/// Weighted mean over the clamped window ending at `index`.
///
/// Weights climb geometrically with step `factor = (n*10)^(1/n)` for an
/// effective window of n bars, starting at weight 1 for the oldest bar.
/// The ladder is close to linear over typical window lengths while keeping
/// the newest bar dominant.
pub fn wma_at(values: &[f64], index: usize, periods: usize) -> f64 {
    let (start, end) = check_range(index, periods);
    let n = end - start + 1;
    let factor = (n as f64 * 10.0).powf(1.0 / n as f64);

    let mut weight = 1.0;
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for &value in &values[start..=end] {
        weighted_sum += value * weight;
        total_weight += weight;
        weight *= factor;
    }
    weighted_sum / total_weight
}

/// Exponential average over the whole series in one incremental pass:
/// `avg[i] = value[i] * alpha + (1 - alpha) * avg[i-1]`, seeded with the
/// first value, `alpha = 2 / (periods + 1)`.
pub fn ema_series(values: &[f64], periods: usize) -> Vec<f64> {
    let alpha = 2.0 / (periods as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&first) => first,
        None => return out,
    };
    out.push(prev);
    for &value in &values[1..] {
        prev = value * alpha + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// Computes the full average series for one recurrence family.
pub fn series(kind: AverageKind, values: &[f64], periods: usize) -> Vec<f64> {
    match kind {
        AverageKind::Sma => (0..values.len())
            .map(|i| sma_at(values, i, periods))
            .collect(),
        AverageKind::Wma => (0..values.len())
            .map(|i| wma_at(values, i, periods))
            .collect(),
        AverageKind::Ema => ema_series(values, periods),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    mod windowing {
        use super::*;

        #[test]
        fn full_window_inside_series() {
            assert_eq!(check_range(10, 3), (8, 10));
        }

        #[test]
        fn left_clamped_near_start() {
            assert_eq!(check_range(0, 5), (0, 0));
            assert_eq!(check_range(2, 5), (0, 2));
        }

        #[test]
        fn sma_left_clamp_uses_available_history() {
            // periods=5 over 3 points: window [0,2], mean 2.0, not a failure
            let values = [1.0, 2.0, 3.0];
            assert_close(sma_at(&values, 2, 5), 2.0);
        }
    }

    mod constant_input {
        use super::*;

        // For a constant series every recurrence must reproduce the constant.
        #[test]
        fn all_recurrences_are_idempotent() {
            let values = vec![42.5; 50];
            for kind in [AverageKind::Sma, AverageKind::Ema, AverageKind::Wma] {
                for periods in [1, 3, 20] {
                    for &avg in &series(kind, &values, periods) {
                        assert_close(avg, 42.5);
                    }
                }
            }
        }
    }

    mod ema {
        use super::*;

        #[test]
        fn recurrence_check() {
            // periods=3 -> alpha=0.5, seed = first value
            let out = ema_series(&[10.0, 20.0, 30.0], 3);
            assert_eq!(out.len(), 3);
            assert_close(out[0], 10.0);
            assert_close(out[1], 15.0);
            assert_close(out[2], 22.5);
        }

        #[test]
        fn empty_series_yields_empty() {
            assert!(ema_series(&[], 3).is_empty());
        }
    }

    mod wma {
        use super::*;

        #[test]
        fn recent_values_dominate() {
            // Rising series: weighted mean sits above the plain mean
            let values = [1.0, 2.0, 3.0, 4.0, 5.0];
            let wma = wma_at(&values, 4, 5);
            let sma = sma_at(&values, 4, 5);
            assert!(wma > sma, "wma {} should exceed sma {}", wma, sma);
        }

        #[test]
        fn window_of_one_returns_value() {
            assert_close(wma_at(&[7.0, 9.0], 1, 1), 9.0);
        }
    }

    mod sma {
        use super::*;

        #[test]
        fn plain_mean_over_window() {
            let values = [2.0, 4.0, 6.0, 8.0];
            assert_close(sma_at(&values, 3, 2), 7.0);
        }
    }
}
