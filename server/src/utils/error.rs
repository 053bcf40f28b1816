use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request body")]
    BadRequest,

    #[error("request object is missing")]
    ObjectIsRequired,

    #[error("event id is missing")]
    ValidEventIdIsRequired,

    #[error("event slot is missing")]
    EventTimingIsRequired,

    #[error("event slot has an unset start or end time")]
    InvalidTimeFormat,

    #[error("limit is not an integer")]
    InvalidLimit,

    #[error("event not found")]
    EventNotFound,

    #[error("no route matches the request")]
    RouteNotFound,

    #[error("request body could not be read")]
    UnprocessableEntity,

    #[error("storage failure")]
    Internal(#[source] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest
            | ApiError::ObjectIsRequired
            | ApiError::ValidEventIdIsRequired
            | ApiError::EventTimingIsRequired
            | ApiError::InvalidTimeFormat
            | ApiError::InvalidLimit => StatusCode::BAD_REQUEST,
            ApiError::EventNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Storage details never appear here.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest => "Error invalid argument",
            ApiError::ObjectIsRequired => "Request object should be provided",
            ApiError::ValidEventIdIsRequired => "A valid event id is required",
            ApiError::EventTimingIsRequired => "Event start time and end time should be provided",
            ApiError::InvalidTimeFormat => {
                "Time Should be passed in RFC3339 Format: 2006-01-02T15:04:05Z07:00"
            }
            ApiError::InvalidLimit => "Limit should be an integral value",
            ApiError::EventNotFound => "Event not found",
            ApiError::RouteNotFound => "404 page not found",
            ApiError::UnprocessableEntity => "Unprocessable Entity",
            ApiError::Internal(_) => "Something went wrong",
        }
    }

    fn log(&self) {
        match self {
            ApiError::Internal(source) => {
                error!(error = ?source, "Storage error");
            }
            _ => {
                warn!(error = %self, status = self.status_code().as_u16(), "Request rejected");
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::EventNotFound,
            StoreError::ObjectRequired => ApiError::ObjectIsRequired,
            StoreError::SlotRequired => ApiError::EventTimingIsRequired,
            StoreError::Database(_) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        error_response(self.status_code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::EventNotFound
        ));
        assert!(matches!(
            ApiError::from(StoreError::ObjectRequired),
            ApiError::ObjectIsRequired
        ));
        assert!(matches!(
            ApiError::from(StoreError::SlotRequired),
            ApiError::EventTimingIsRequired
        ));

        let internal = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message(), "Something went wrong");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidLimit.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EventNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::UnprocessableEntity.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
