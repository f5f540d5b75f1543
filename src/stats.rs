//! Sample statistics for Monte Carlo results.

/// Percentile of the 95th rank, used for wait-time reporting.
pub const P95: f64 = 0.95;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the `n - 1` denominator.
///
/// Returns 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Standard error of the mean, `sample_std / sqrt(n)`; 0 for `n <= 1`.
pub fn std_error(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    sample_std(values) / (n as f64).sqrt()
}

/// Percentile `q` (in `[0, 1]`) by linear interpolation between order statistics.
///
/// Sorts a copy of `values`. Returns 0 for an empty slice.
///
/// # Examples
///
/// ```
/// use ev_station_opt::stats::percentile;
///
/// let waits: Vec<f64> = (1..=10).map(f64::from).collect();
/// assert!((percentile(&waits, 0.95) - 9.55).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, q)
}

/// Same as [`percentile`] for input that is already sorted ascending.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return 0.0;
    };
    if sorted.len() == 1 {
        return last;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Deviations from 5: -3, -1, 1, 3 -> ss = 20, /3
        let v = [2.0, 4.0, 6.0, 8.0];
        assert!((sample_std(&v) - (20.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_zero_spread() {
        assert_eq!(sample_std(&[42.0]), 0.0);
        assert_eq!(std_error(&[42.0]), 0.0);
        assert_eq!(std_error(&[]), 0.0);
    }

    #[test]
    fn std_error_divides_by_sqrt_n() {
        let v = [2.0, 4.0, 6.0, 8.0];
        assert!((std_error(&v) - sample_std(&v) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn p95_of_one_to_ten() {
        let v: Vec<f64> = (1..=10).map(f64::from).collect();
        assert!((percentile(&v, P95) - 9.55).abs() < 1e-12);
    }

    #[test]
    fn percentile_ignores_input_order() {
        let v = [10.0, 1.0, 7.0, 3.0, 5.0, 9.0, 2.0, 8.0, 4.0, 6.0];
        assert!((percentile(&v, P95) - 9.55).abs() < 1e-12);
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 1.0), 10.0);
        assert!((percentile(&v, 0.5) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn percentile_edge_cases() {
        assert_eq!(percentile(&[], 0.95), 0.0);
        assert_eq!(percentile(&[3.5], 0.95), 3.5);
    }
}
