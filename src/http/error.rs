use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::domain::order::OrderError;
use crate::metrics::Outcome;
use crate::models::ErrorResponse;

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            OrderError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<&OrderError> for Outcome {
    fn from(err: &OrderError) -> Self {
        match err {
            OrderError::InvalidArgument(_) => Outcome::Invalid,
            OrderError::Storage(_) => Outcome::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid = OrderError::InvalidArgument("take must not be negative".to_string());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let storage = OrderError::Storage(sqlx::Error::PoolTimedOut);
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_outcome_mapping() {
        let invalid = OrderError::InvalidArgument(String::new());
        assert_eq!(Outcome::from(&invalid), Outcome::Invalid);
        assert_eq!(
            Outcome::from(&OrderError::Storage(sqlx::Error::PoolClosed)),
            Outcome::Error
        );
    }
}
