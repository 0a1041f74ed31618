//! Applying a scheme to a whole column of observations.

use crate::maybe_rayon::*;
use surtclass_core::{Error, Result};

use super::fit::fit;
use super::scheme::{ClassificationMethod, Scheme};

/// Parameters for fitting and applying a scheme in one step
#[derive(Debug, Clone)]
pub struct ClassifyParams {
    /// Number of classes (default: 5)
    pub k: usize,
    /// Fitting method (default: natural breaks)
    pub method: ClassificationMethod,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            k: 5,
            method: ClassificationMethod::NaturalBreaks,
        }
    }
}

/// Class assignment for a column of observations, in input order.
#[derive(Debug, Clone)]
pub struct Classification {
    scheme: Scheme,
    values: Vec<f64>,
    indices: Vec<usize>,
}

impl Classification {
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Class index per observation.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Class label per observation.
    pub fn labels(&self) -> Vec<&str> {
        let labels = self.scheme.labels();
        self.indices.iter().map(|&i| labels[i].as_str()).collect()
    }

    /// Number of observations in each class, lowest class first.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.scheme.num_classes()];
        for &i in &self.indices {
            counts[i] += 1;
        }
        counts
    }

    /// Goodness of variance fit: `1 - SDCM / SDAM`.
    ///
    /// SDAM is the squared deviation of all values from the overall mean,
    /// SDCM the sum of squared deviations from each class mean. 1.0 is a
    /// perfect fit; a constant column also scores 1.0.
    pub fn gvf(&self) -> f64 {
        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let sdam: f64 = self.values.iter().map(|v| (v - mean) * (v - mean)).sum();
        if sdam == 0.0 {
            return 1.0;
        }

        let k = self.scheme.num_classes();
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for (&v, &c) in self.values.iter().zip(&self.indices) {
            sums[c] += v;
            counts[c] += 1;
        }
        let sdcm: f64 = self
            .values
            .iter()
            .zip(&self.indices)
            .map(|(&v, &c)| {
                let class_mean = sums[c] / counts[c] as f64;
                (v - class_mean) * (v - class_mean)
            })
            .sum();

        1.0 - sdcm / sdam
    }
}

/// Classify every value with `scheme`, preserving input order.
///
/// Fails with [`Error::InvalidInput`] on empty input or the first NaN.
pub fn classify_all(values: &[f64], scheme: &Scheme) -> Result<Classification> {
    if values.is_empty() {
        return Err(Error::InvalidInput("no values to classify".into()));
    }

    let indices: Vec<usize> = values
        .into_par_iter()
        .map(|&v| scheme.class_index(v))
        .collect::<Result<Vec<usize>>>()?;

    Ok(Classification {
        scheme: scheme.clone(),
        values: values.to_vec(),
        indices,
    })
}

/// Fit a scheme to `values` and classify them with it.
pub fn fit_classify(values: &[f64], params: ClassifyParams) -> Result<Classification> {
    let scheme = fit(values, params.k, params.method)?;
    classify_all(values, &scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_preserves_order() {
        let scheme = Scheme::from_breaks(vec![50.0, 250.0])
            .unwrap()
            .with_labels(["Low", "Medium", "High"])
            .unwrap();
        let c = classify_all(&[1000.0, 10.0, 50.0, 249.0], &scheme).unwrap();
        assert_eq!(c.labels(), vec!["High", "Low", "Medium", "Medium"]);
        assert_eq!(c.indices(), &[2, 0, 1, 1]);
        assert_eq!(c.counts(), vec![1, 2, 1]);
    }

    #[test]
    fn test_classify_all_rejects_nan() {
        let scheme = Scheme::from_breaks(vec![1.0]).unwrap();
        assert!(classify_all(&[0.0, f64::NAN], &scheme).is_err());
        assert!(classify_all(&[], &scheme).is_err());
    }

    #[test]
    fn test_fit_classify_outlier() {
        let c = fit_classify(
            &[1.0, 2.0, 3.0, 4.0, 100.0],
            ClassifyParams { k: 2, ..Default::default() },
        )
        .unwrap();
        assert_eq!(c.counts(), vec![4, 1]);
        assert!(c.gvf() > 0.99);
    }

    #[test]
    fn test_gvf_bounds() {
        let values: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
        let c2 = fit_classify(&values, ClassifyParams { k: 2, ..Default::default() }).unwrap();
        let c5 = fit_classify(&values, ClassifyParams { k: 5, ..Default::default() }).unwrap();
        assert!(c2.gvf() > 0.0 && c2.gvf() <= 1.0);
        assert!(c5.gvf() >= c2.gvf(), "more classes should not fit worse");
    }

    #[test]
    fn test_gvf_constant_column() {
        let c = fit_classify(&[7.0, 7.0], ClassifyParams { k: 1, ..Default::default() }).unwrap();
        assert_eq!(c.gvf(), 1.0);
    }
}
