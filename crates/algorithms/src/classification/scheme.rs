//! Classification schemes: sorted break-points with ordered labels.
//!
//! `k - 1` break-points split the real line into `k` half-open classes:
//!
//! ```text
//! (-inf, b1)  [b1, b2)  ...  [b(k-1), +inf)
//! ```
//!
//! A value equal to a break-point belongs to the class above it. The
//! outermost classes are unbounded, so every finite value has a class.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use surtclass_core::{Error, Result};

/// How a scheme's break-points were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ClassificationMethod {
    /// Classes of equal width between the data minimum and maximum
    EqualInterval,
    /// Classes holding (roughly) the same number of observations
    Quantiles,
    /// Jenks optimal partition minimising within-class variance
    #[default]
    NaturalBreaks,
    /// Break-points supplied by the caller
    UserDefined,
}

impl ClassificationMethod {
    /// Methods that derive break-points from data.
    pub const FITTED: &[ClassificationMethod] = &[
        Self::EqualInterval,
        Self::Quantiles,
        Self::NaturalBreaks,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EqualInterval => "Equal interval",
            Self::Quantiles => "Quantiles",
            Self::NaturalBreaks => "Natural breaks (Jenks)",
            Self::UserDefined => "User defined",
        }
    }
}

/// An ordered partition of the value domain into labelled classes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scheme {
    method: ClassificationMethod,
    breaks: Vec<f64>,
    labels: Vec<String>,
    /// (min, max) of the data the scheme was fitted on
    data_range: Option<(f64, f64)>,
}

impl Scheme {
    /// Build a scheme from explicit break-points.
    ///
    /// Break-points must be finite and strictly increasing. An empty list is
    /// a valid single-class scheme. Labels default to the class indices.
    pub fn from_breaks(breaks: Vec<f64>) -> Result<Self> {
        validate_breaks(&breaks)?;
        Ok(Self::new_unchecked(ClassificationMethod::UserDefined, breaks, None))
    }

    /// Used by the fitting routines, which produce valid breaks by construction.
    pub(crate) fn new_unchecked(
        method: ClassificationMethod,
        breaks: Vec<f64>,
        data_range: Option<(f64, f64)>,
    ) -> Self {
        let labels = (0..=breaks.len()).map(|i| i.to_string()).collect();
        Self {
            method,
            breaks,
            labels,
            data_range,
        }
    }

    /// Replace the class labels. One label per class, lowest class first.
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.num_classes() {
            return Err(Error::InvalidInput(format!(
                "scheme has {} classes but {} labels were given",
                self.num_classes(),
                labels.len()
            )));
        }
        self.labels = labels;
        Ok(self)
    }

    pub fn method(&self) -> ClassificationMethod {
        self.method
    }

    /// Interior break-points, ascending.
    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.breaks.len() + 1
    }

    /// Minimum and maximum of the fitted data, if fitted.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.data_range
    }

    /// Index of the class containing `value` (0 = lowest).
    ///
    /// Values below the first break fall in class 0 and values above the
    /// last break fall in the top class. NaN is rejected.
    pub fn class_index(&self, value: f64) -> Result<usize> {
        if value.is_nan() {
            return Err(Error::InvalidInput("cannot classify NaN".into()));
        }
        Ok(self.breaks.partition_point(|&b| b <= value))
    }

    /// Label of the class containing `value`.
    pub fn classify(&self, value: f64) -> Result<&str> {
        let idx = self.class_index(value)?;
        Ok(&self.labels[idx])
    }

    /// Lower and upper bound of class `idx`. Outer classes are unbounded
    /// unless the scheme was fitted, in which case they stop at the data
    /// minimum / maximum.
    pub fn class_bounds(&self, idx: usize) -> Option<(f64, f64)> {
        if idx >= self.num_classes() {
            return None;
        }
        let (lo_default, hi_default) = self
            .data_range
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        let lo = if idx == 0 { lo_default } else { self.breaks[idx - 1] };
        let hi = self.breaks.get(idx).copied().unwrap_or(hi_default);
        Some((lo, hi))
    }
}

/// Label of the class of `scheme` containing `value`.
pub fn classify(value: f64, scheme: &Scheme) -> Result<&str> {
    scheme.classify(value)
}

fn validate_breaks(breaks: &[f64]) -> Result<()> {
    if let Some(b) = breaks.iter().find(|b| !b.is_finite()) {
        return Err(Error::InvalidInput(format!("break-point {} is not finite", b)));
    }
    if let Some(w) = breaks.windows(2).find(|w| w[0] >= w[1]) {
        return Err(Error::InvalidInput(format!(
            "break-points must be strictly increasing, found {} before {}",
            w[0], w[1]
        )));
    }
    Ok(())
}
