//! Fitting classification schemes to data
//!
//! - **Equal interval**: `k` classes of equal width over `[min, max]`
//! - **Quantiles**: break-points at the `i/k` quantiles (linear interpolation)
//! - **Natural breaks**: Jenks optimal partition, solved exactly by dynamic
//!   programming over the distinct sorted values

use surtclass_core::{Error, Result};
use tracing::debug;

use super::scheme::{ClassificationMethod, Scheme};

/// Fit a `k`-class scheme to `values` with the given method.
///
/// # Errors
/// [`Error::InvalidInput`] when `values` is empty, contains a non-finite
/// value, `k` is zero, or `k` exceeds the number of distinct values.
/// [`Error::InvalidParameter`] for [`ClassificationMethod::UserDefined`],
/// which has nothing to fit (use [`Scheme::from_breaks`]).
pub fn fit(values: &[f64], k: usize, method: ClassificationMethod) -> Result<Scheme> {
    let sorted = sorted_finite(values)?;
    if k == 0 {
        return Err(Error::InvalidInput("number of classes must be positive".into()));
    }

    let (distinct, weights) = distinct_with_counts(&sorted);
    if k > distinct.len() {
        return Err(Error::InvalidInput(format!(
            "cannot form {} classes from {} distinct values",
            k,
            distinct.len()
        )));
    }

    let breaks = match method {
        ClassificationMethod::EqualInterval => equal_interval_breaks(&sorted, k),
        ClassificationMethod::Quantiles => quantile_breaks(&sorted, k),
        ClassificationMethod::NaturalBreaks => natural_breaks(&distinct, &weights, k),
        ClassificationMethod::UserDefined => {
            return Err(Error::InvalidParameter {
                name: "method",
                value: method.name().into(),
                reason: "user-defined schemes are built from explicit break-points".into(),
            })
        }
    };

    if breaks.len() + 1 < k {
        debug!(
            "{}: ties collapsed {} requested classes into {}",
            method.name(),
            k,
            breaks.len() + 1
        );
    }

    let range = (sorted[0], sorted[sorted.len() - 1]);
    Ok(Scheme::new_unchecked(method, breaks, Some(range)))
}

/// Copy and sort, rejecting empty input and non-finite values.
pub(crate) fn sorted_finite(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::InvalidInput("no values to classify".into()));
    }
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "value at index {} is not a finite number ({})",
            i, v
        )));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(sorted)
}

/// Distinct values of a sorted slice with their multiplicities.
fn distinct_with_counts(sorted: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut distinct: Vec<f64> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();
    for &v in sorted {
        match counts.last_mut() {
            Some(count) if distinct.last() == Some(&v) => *count += 1.0,
            _ => {
                distinct.push(v);
                counts.push(1.0);
            }
        }
    }
    (distinct, counts)
}

/// `a + (b - a) * t` without overflowing when `b - a` exceeds `f64::MAX`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        return a;
    }
    a * (1.0 - t) + b * t
}

/// Append `b` if it is finite, within `(min, max]` and above the previous
/// break. A break at the minimum would leave the lowest class empty.
fn push_break(breaks: &mut Vec<f64>, b: f64, (min, max): (f64, f64)) {
    if b.is_finite() && b > min && b <= max && breaks.last().map_or(true, |&last| b > last) {
        breaks.push(b);
    }
}

fn equal_interval_breaks(sorted: &[f64], k: usize) -> Vec<f64> {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mut breaks: Vec<f64> = Vec::with_capacity(k - 1);
    for i in 1..k {
        push_break(&mut breaks, lerp(min, max, i as f64 / k as f64), (min, max));
    }
    // Values a few ulps apart can round every break out of (min, max]
    if k > 1 && breaks.is_empty() {
        breaks.push(max);
    }
    breaks
}

fn quantile_breaks(sorted: &[f64], k: usize) -> Vec<f64> {
    let n = sorted.len();
    let range = (sorted[0], sorted[n - 1]);
    let mut breaks: Vec<f64> = Vec::with_capacity(k - 1);
    for i in 1..k {
        let pos = (i as f64 / k as f64) * (n - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        push_break(&mut breaks, lerp(sorted[lo], sorted[hi], pos - lo as f64), range);
    }
    breaks
}

/// Jenks natural breaks over weighted distinct values.
///
/// `cost[c][j]` is the minimum within-class sum of squared deviations when
/// the first `j` distinct values form `c + 1` classes. Ties between equally
/// good splits resolve to the lowest split index. Each break-point is the
/// smallest value of the class above it.
fn natural_breaks(distinct: &[f64], weights: &[f64], k: usize) -> Vec<f64> {
    let m = distinct.len();
    if k <= 1 {
        return Vec::new();
    }

    // Scale into [-1, 1] and centre on the weighted mean so the squared
    // sums stay finite and precise. Neither changes the optimal split.
    let scale = distinct.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let total: f64 = weights.iter().sum();
    let mean = distinct
        .iter()
        .zip(weights)
        .map(|(v, w)| v / scale * w)
        .sum::<f64>()
        / total;

    // Prefix sums of weight, weighted value and weighted square
    let mut cw = vec![0.0; m + 1];
    let mut cs = vec![0.0; m + 1];
    let mut cq = vec![0.0; m + 1];
    for j in 0..m {
        let (v, w) = (distinct[j] / scale - mean, weights[j]);
        cw[j + 1] = cw[j] + w;
        cs[j + 1] = cs[j] + w * v;
        cq[j + 1] = cq[j] + w * v * v;
    }
    // Sum of squared deviations of distinct[i..j]
    let ssd = |i: usize, j: usize| -> f64 {
        let w = cw[j] - cw[i];
        let s = cs[j] - cs[i];
        (cq[j] - cq[i] - s * s / w).max(0.0)
    };

    let mut cost = vec![vec![f64::INFINITY; m + 1]; k];
    let mut split = vec![vec![0usize; m + 1]; k];
    for j in 1..=m {
        cost[0][j] = ssd(0, j);
    }
    for c in 1..k {
        for j in (c + 1)..=m {
            let mut best = f64::INFINITY;
            let mut best_i = c;
            for i in c..j {
                let candidate = cost[c - 1][i] + ssd(i, j);
                if candidate < best {
                    best = candidate;
                    best_i = i;
                }
            }
            cost[c][j] = best;
            split[c][j] = best_i;
        }
    }

    let mut breaks = Vec::with_capacity(k - 1);
    let mut j = m;
    for c in (1..k).rev() {
        let i = split[c][j];
        breaks.push(distinct[i]);
        j = i;
    }
    breaks.reverse();
    breaks
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLIER: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 100.0];

    fn classes(values: &[f64], scheme: &Scheme) -> Vec<usize> {
        values.iter().map(|&v| scheme.class_index(v).unwrap()).collect()
    }

    #[test]
    fn test_equal_interval_separates_outlier() {
        let s = fit(&OUTLIER, 2, ClassificationMethod::EqualInterval).unwrap();
        assert_eq!(s.breaks(), &[50.5]);
        assert_eq!(classes(&OUTLIER, &s), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_natural_breaks_separates_outlier() {
        let s = fit(&OUTLIER, 2, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[100.0]);
        assert_eq!(classes(&OUTLIER, &s), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_natural_breaks_three_clusters() {
        let values = [1.0, 2.0, 3.0, 20.0, 21.0, 22.0, 50.0, 51.0, 52.0];
        let s = fit(&values, 3, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[20.0, 50.0]);
        assert_eq!(s.data_range(), Some((1.0, 52.0)));
    }

    #[test]
    fn test_natural_breaks_unsorted_with_ties() {
        let values = [52.0, 1.0, 1.0, 51.0, 2.0, 1.0, 50.0];
        let s = fit(&values, 2, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[50.0]);
        assert_eq!(classes(&values, &s), vec![1, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_natural_breaks_k_equals_distinct() {
        let values = [3.0, 1.0, 2.0, 2.0];
        let s = fit(&values, 3, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[2.0, 3.0]);
    }

    #[test]
    fn test_quantiles_even_split() {
        let values: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let s = fit(&values, 4, ClassificationMethod::Quantiles).unwrap();
        assert_eq!(s.breaks(), &[2.75, 4.5, 6.25]);
        let counts = classes(&values, &s).iter().fold(vec![0; 4], |mut acc, &c| {
            acc[c] += 1;
            acc
        });
        assert_eq!(counts, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_quantiles_collapse_ties() {
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let s = fit(&values, 3, ClassificationMethod::Quantiles).unwrap();
        // Both the 1/3 and 2/3 quantiles land on the minimum or repeat
        assert!(s.num_classes() < 3);
        assert!(s.breaks().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_class() {
        let s = fit(&[5.0, 5.0, 5.0], 1, ClassificationMethod::EqualInterval).unwrap();
        assert!(s.breaks().is_empty());
        assert_eq!(s.classify(5.0).unwrap(), "0");
    }

    #[test]
    fn test_empty_input() {
        let err = fit(&[], 2, ClassificationMethod::Quantiles).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_input() {
        let err = fit(&[1.0, f64::NAN, 3.0], 2, ClassificationMethod::EqualInterval).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_k_zero() {
        assert!(fit(&[1.0, 2.0], 0, ClassificationMethod::NaturalBreaks).is_err());
    }

    #[test]
    fn test_k_exceeds_distinct() {
        let err = fit(&[1.0, 1.0, 2.0, 2.0], 3, ClassificationMethod::NaturalBreaks).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_user_defined_not_fittable() {
        let err = fit(&[1.0, 2.0], 2, ClassificationMethod::UserDefined).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_fitted_breaks_strictly_increasing() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 * 1.5).collect();
        for &method in ClassificationMethod::FITTED {
            let s = fit(&values, 6, method).unwrap();
            assert!(
                s.breaks().windows(2).all(|w| w[0] < w[1]),
                "{} produced unsorted breaks {:?}",
                method.name(),
                s.breaks()
            );
        }
    }

    #[test]
    fn test_equal_interval_extreme_range() {
        let values = [-1.7e308, 1.7e308];
        let s = fit(&values, 2, ClassificationMethod::EqualInterval).unwrap();
        assert!(s.breaks().iter().all(|b| b.is_finite()));
        assert_eq!(classes(&values, &s), vec![0, 1]);
        assert!(Scheme::from_breaks(s.breaks().to_vec()).is_ok());
    }

    #[test]
    fn test_equal_interval_values_ulps_apart() {
        let values = [1.0, 1.0 + f64::EPSILON, 1.0 + 2.0 * f64::EPSILON];
        let s = fit(&values, 3, ClassificationMethod::EqualInterval).unwrap();
        assert!(s.breaks().windows(2).all(|w| w[0] < w[1]));
        assert!(s.breaks().iter().all(|&b| b > values[0]));
        assert!(s.class_index(values[2]).unwrap() > 0, "max must not share the lowest class");
        assert!(Scheme::from_breaks(s.breaks().to_vec()).is_ok());
    }

    #[test]
    fn test_quantiles_extreme_range() {
        let values = [-1.7e308, 0.0, 1.7e308];
        let s = fit(&values, 2, ClassificationMethod::Quantiles).unwrap();
        assert!(s.breaks().iter().all(|b| b.is_finite()));
        assert_eq!(classes(&values, &s), vec![0, 1, 1]);
    }

    #[test]
    fn test_natural_breaks_huge_magnitudes() {
        let values = [1e200, 2e200, 3e200, 1e250];
        let s = fit(&values, 2, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[1e250]);
        assert_eq!(classes(&values, &s), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_natural_breaks_large_offset() {
        // Clusters that differ only far below the magnitude of the values
        let values = [1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0, 1e9 + 40.0, 1e9 + 41.0];
        let s = fit(&values, 2, ClassificationMethod::NaturalBreaks).unwrap();
        assert_eq!(s.breaks(), &[1e9 + 40.0]);
    }
}
