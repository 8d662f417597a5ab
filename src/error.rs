//! Error types for sqlweave.

use thiserror::Error;

/// The main error type for sqlweave operations.
#[derive(Debug, Error)]
pub enum SqlWeaveError {
    /// A value of the wrong shape was handed to a constructor.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The query is incomplete or inconsistent for the requested compilation.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A resolver callback returned something other than a query or statement.
    #[error("Invalid return value: {0}")]
    InvalidReturnValue(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlWeaveError {
    /// Create an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Rewrap an error raised while compiling a sub-query.
    ///
    /// The result is always `InvalidQuery`; the inner message is kept intact.
    pub fn in_subquery(self) -> Self {
        Self::InvalidQuery(format!("Error in a subquery: {}", self.message()))
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidArgument(m)
            | Self::InvalidQuery(m)
            | Self::InvalidReturnValue(m)
            | Self::Config(m) => m.clone(),
            Self::Json(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
        }
    }
}

/// Result type alias for sqlweave operations.
pub type SqlWeaveResult<T> = Result<T, SqlWeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SqlWeaveError::invalid_query("The FROM table is not set");
        assert_eq!(err.to_string(), "Invalid query: The FROM table is not set");
    }

    #[test]
    fn test_subquery_wrapping_keeps_message() {
        let err = SqlWeaveError::invalid_query("The FROM table is not set").in_subquery();
        assert!(matches!(err, SqlWeaveError::InvalidQuery(_)));
        assert_eq!(
            err.to_string(),
            "Invalid query: Error in a subquery: The FROM table is not set"
        );

        let nested = err.in_subquery();
        assert_eq!(
            nested.message(),
            "Error in a subquery: Error in a subquery: The FROM table is not set"
        );
    }
}
