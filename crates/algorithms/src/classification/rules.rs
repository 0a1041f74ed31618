//! Ordered threshold rules
//!
//! A reusable form of the `if v < 50 { "Low" } else if v < 250 { "Medium" }
//! else { "High" }` cascade. Rules are evaluated in the order given and the
//! first rule with `value < threshold` wins, so the table need not be sorted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use surtclass_core::{Error, Result};

/// A single `value < threshold => label` rule
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    pub threshold: f64,
    pub label: String,
}

impl Rule {
    pub fn new(threshold: f64, label: impl Into<String>) -> Self {
        Self {
            threshold,
            label: label.into(),
        }
    }
}

/// Ordered rule table with an optional fallback label
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleTable {
    rules: Vec<Rule>,
    default: Option<String>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Later rules are only reached when earlier ones miss.
    pub fn rule(mut self, threshold: f64, label: impl Into<String>) -> Self {
        self.rules.push(Rule::new(threshold, label));
        self
    }

    /// Label returned when no rule matches.
    pub fn with_default(mut self, label: impl Into<String>) -> Self {
        self.default = Some(label.into());
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_label(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Label for `value`: first matching rule, else the default.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] for NaN, [`Error::UnclassifiableValue`] when
    /// nothing matches and the table has no default.
    pub fn evaluate(&self, value: f64) -> Result<&str> {
        if value.is_nan() {
            return Err(Error::InvalidInput("cannot classify NaN".into()));
        }
        self.rules
            .iter()
            .find(|r| value < r.threshold)
            .map(|r| r.label.as_str())
            .or(self.default.as_deref())
            .ok_or(Error::UnclassifiableValue(value))
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
            default: None,
        }
    }
}

/// Classify `value` with an ordered rule table.
pub fn custom_classify(value: f64, table: &RuleTable) -> Result<&str> {
    table.evaluate(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population_rules() -> RuleTable {
        RuleTable::new()
            .rule(50.0, "Low")
            .rule(250.0, "Medium")
            .with_default("High")
    }

    #[test]
    fn test_cascade() {
        let t = population_rules();
        assert_eq!(custom_classify(10.0, &t).unwrap(), "Low");
        assert_eq!(custom_classify(50.0, &t).unwrap(), "Medium");
        assert_eq!(custom_classify(249.9, &t).unwrap(), "Medium");
        assert_eq!(custom_classify(250.0, &t).unwrap(), "High");
        assert_eq!(custom_classify(f64::INFINITY, &t).unwrap(), "High");
    }

    #[test]
    fn test_order_sensitive() {
        // The wide rule shadows the narrow one when listed first
        let t = RuleTable::new().rule(250.0, "Wide").rule(50.0, "Narrow");
        assert_eq!(custom_classify(10.0, &t).unwrap(), "Wide");
    }

    #[test]
    fn test_no_match_without_default() {
        let t: RuleTable = vec![Rule::new(50.0, "Low")].into_iter().collect();
        match custom_classify(75.0, &t) {
            Err(Error::UnclassifiableValue(v)) => assert_eq!(v, 75.0),
            other => panic!("expected UnclassifiableValue, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_uses_default() {
        let t = RuleTable::new().with_default("Other");
        assert_eq!(custom_classify(1.0, &t).unwrap(), "Other");
        assert!(custom_classify(1.0, &RuleTable::new()).is_err());
    }

    #[test]
    fn test_nan() {
        let t = population_rules();
        assert!(matches!(custom_classify(f64::NAN, &t), Err(Error::InvalidInput(_))));
    }
}
