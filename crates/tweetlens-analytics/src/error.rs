use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Text was empty (or empty after normalization) where content is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A non-positive `n` or otherwise malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No vector is indexed for the given record id.
    #[error("record {0} not found")]
    NotFound(i64),
}

/// Validate a caller-supplied result count.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] when `n` is zero or negative.
pub fn require_positive(n: i64) -> Result<usize, AnalyticsError> {
    if n <= 0 {
        return Err(AnalyticsError::InvalidArgument(format!(
            "n must be positive, got {n}"
        )));
    }
    usize::try_from(n).map_err(|_| AnalyticsError::InvalidArgument(format!("n is too large: {n}")))
}
