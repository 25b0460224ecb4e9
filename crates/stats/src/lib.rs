//! Statistical helper functions shared by the ceres crates.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    match data.len() {
        0 => 0.0,
        n => data.iter().sum::<f64>() / n as f64,
    }
}

/// Sample variance (divisor `n - 1`); 0 below two values.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let sum_sq: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (data.len() - 1) as f64
}

/// Sample standard deviation; 0 below two values.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median of unsorted data; 0 for an empty slice.
///
/// An even count averages the two middle values. NaN sorts as equal to
/// everything.
pub fn median(data: &[f64]) -> f64 {
    let mut v = data.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    match v.len() {
        0 => 0.0,
        n if n % 2 == 1 => v[mid],
        _ => (v[mid - 1] + v[mid]) / 2.0,
    }
}

/// Smallest value, or `None` for an empty slice.
pub fn min(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::min)
}

/// Largest value, or `None` for an empty slice.
pub fn max(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::max)
}

/// Least-squares slope of `y` against `x`.
///
/// Pairs are read up to the shorter slice. Returns 0 below two points or
/// when every `x` is equal.
pub fn linear_trend(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let (mx, my) = (mean(x), mean(y));
    let (num, den) = x.iter().zip(y).fold((0.0, 0.0), |(num, den), (xi, yi)| {
        (num + (xi - mx) * (yi - my), den + (xi - mx).powi(2))
    });
    if den == 0.0 { 0.0 } else { num / den }
}

/// Most frequent item and its count.
///
/// Ties go to the item encountered first. Returns `None` if `items` is empty.
pub fn mode<T: PartialEq>(items: &[T]) -> Option<(&T, usize)> {
    let mut counts: Vec<(&T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    // `max_by_key` keeps the last maximum, so scan manually to keep the first.
    let mut best: Option<(&T, usize)> = None;
    for (item, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((item, count));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn mean_and_spread() {
        assert_relative_eq!(mean(&SAMPLE), 5.0);
        // Sum of squared deviations is 32 over 7 degrees of freedom.
        assert_relative_eq!(variance(&SAMPLE), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(sd(&SAMPLE), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn short_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(sd(&[12.0]), 0.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn median_of_unsorted_input() {
        assert_eq!(median(&[9.0, 1.0, 4.0]), 4.0);
        assert_eq!(median(&[0.0, 10.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(&[7.5]), 7.5);
    }

    #[test]
    fn test_min_max() {
        let data = [4.0, -1.5, 9.0, 0.0];
        assert_eq!(min(&data), Some(-1.5));
        assert_eq!(max(&data), Some(9.0));
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn trend_of_a_line() {
        let years = [2000.0, 2001.0, 2002.0, 2003.0];
        let values = [10.0, 12.5, 15.0, 17.5];
        assert_relative_eq!(linear_trend(&years, &values), 2.5, epsilon = 1e-12);

        // Noise around a falling line: -0.5 per step.
        let noisy = [10.0, 9.7, 9.0, 8.5];
        assert_relative_eq!(linear_trend(&years, &noisy), -0.52, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_trends_are_zero() {
        assert_eq!(linear_trend(&[2000.0], &[5.0]), 0.0);
        assert_eq!(linear_trend(&[2000.0, 2000.0], &[1.0, 3.0]), 0.0);
        assert_eq!(linear_trend(&[], &[]), 0.0);
    }

    #[test]
    fn test_mode_counts() {
        let items = ["a", "b", "b", "c"];
        assert_eq!(mode(&items), Some((&"b", 2)));
    }

    #[test]
    fn test_mode_tie_keeps_first_encountered() {
        let items = ["x", "y", "y", "x", "z"];
        assert_eq!(mode(&items), Some((&"x", 2)));
    }

    #[test]
    fn test_mode_empty() {
        let items: [u8; 0] = [];
        assert_eq!(mode(&items), None);
    }
}
