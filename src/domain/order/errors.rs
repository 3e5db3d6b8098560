// ============================================================================
// Order Errors
// ============================================================================
//
// A missing order is not an error: lookups return `Option`/`bool` instead.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Rejected before the store is touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OrderError::InvalidArgument("customerId is required".to_string());
        assert_eq!(err.to_string(), "Invalid argument: customerId is required");

        let err = OrderError::from(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("Storage failure:"));
    }
}
