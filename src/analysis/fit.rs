//! Horizontal least-squared-error alignment of an average against its
//! required source.
//!
//! The search is a 1-D hill climb over integer shifts: starting at shift 0
//! it walks in one direction while the error keeps falling, reverses once
//! when it rises, and stops on the second rise, committing the best shift
//! seen. This assumes a unimodal error surface; a pathological average
//! shape can converge to a local minimum (known limitation).

/// Mean squared residual between `source[i]` and `average[i + shift]`
/// over the overlapping index range. `None` when nothing overlaps.
fn shift_error(source: &[f64], average: &[f64], shift: i64) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, &src) in source.iter().enumerate() {
        let j = i as i64 + shift;
        if j < 0 {
            continue;
        }
        if let Some(&avg) = average.get(j as usize) {
            let diff = src - avg;
            sum += diff * diff;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Finds the integer shift minimizing the residual between the source
/// projection and the shifted average.
pub fn best_shift(source: &[f64], average: &[f64]) -> i64 {
    let Some(mut best_error) = shift_error(source, average, 0) else {
        return 0;
    };
    let mut best_shift = 0i64;

    let mut step = -1i64;
    let mut reversed = false;
    let mut shift = 0i64;
    let limit = average.len() as i64;

    loop {
        shift += step;
        if shift.abs() >= limit {
            if reversed {
                break;
            }
            reversed = true;
            step = -step;
            shift = best_shift;
            continue;
        }

        match shift_error(source, average, shift) {
            Some(error) if error < best_error => {
                best_error = error;
                best_shift = shift;
            }
            _ => {
                if reversed {
                    break;
                }
                // First rise: turn around once, restarting from the best
                // shift found so far.
                reversed = true;
                step = -step;
                shift = best_shift;
            }
        }
    }

    best_shift
}
