//! Analytics error types.

use thiserror::Error;

/// Errors raised by zone estimation.
///
/// Load aggregation never fails; it normalizes missing values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Every power test was absent or zero.
    #[error("No valid power test: enter at least one test result")]
    NoValidTest,

    /// The regression could not produce a usable fit.
    #[error("Degenerate regression: {0}")]
    DegenerateRegression(String),
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
