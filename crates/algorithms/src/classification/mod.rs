//! Value classification for attribute columns
//!
//! Turns a column of numeric observations into ordered, labelled classes:
//! - **Equal interval**: classes of equal width
//! - **Quantiles**: classes of (roughly) equal size
//! - **Natural breaks**: Jenks variance-minimising partition
//! - **User defined**: explicit break-points
//! - **Rule tables**: ordered `value < threshold` cascades with a default

mod fit;
mod result;
mod rules;
mod scheme;

pub use fit::fit;
pub use result::{classify_all, fit_classify, Classification, ClassifyParams};
pub use rules::{custom_classify, Rule, RuleTable};
pub use scheme::{classify, ClassificationMethod, Scheme};
