//! Error types for SurtClass

use thiserror::Error;

/// Main error type for SurtClass operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty input, non-numeric values, or an unreachable class count.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A custom rule table had no matching rule and no default label.
    #[error("Value {0} matches no rule and the table has no default label")]
    UnclassifiableValue(f64),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for SurtClass operations
pub type Result<T> = std::result::Result<T, Error>;
