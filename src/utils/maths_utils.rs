use argminmax::ArgMinMax;

/// Min and max of a non-empty slice in one pass.
#[inline]
pub fn value_min_max(values: &[f64]) -> (f64, f64) {
    debug_assert!(!values.is_empty());
    let (min_index, max_index) = values.argminmax();
    (values[min_index], values[max_index])
}

/// Rounds a value to the given number of decimal places.
#[inline]
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_of_mixed_values() {
        let values = [3.0, -1.0, 7.5, 0.0];
        assert_eq!(value_min_max(&values), (-1.0, 7.5));
    }

    #[test]
    fn rounding_by_decimals() {
        assert_eq!(round_to_decimals(1.23456, 3), 1.235);
        assert_eq!(round_to_decimals(-1.005, 1), -1.0);
    }
}
