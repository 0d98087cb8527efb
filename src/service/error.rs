use thiserror::Error;
use axum::http::StatusCode;

use crate::{
    error::{ErrorMessage, HttpError},
    models::listingmodel::ListingKind,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid listing type: {0}")]
    InvalidListingType(String),

    #[error("{kind} {id} not found")]
    ListingNotFound { kind: ListingKind, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidListingType(_) => {
                HttpError::not_found(ErrorMessage::InvalidListingType.to_string())
            }

            ServiceError::ListingNotFound { .. } => {
                HttpError::not_found(ErrorMessage::ListingNotFound.to_string())
            }

            ServiceError::Validation(message) => HttpError::bad_request(message),

            ServiceError::Database(e) => {
                tracing::error!("Listing store failure: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidListingType(_)
            | ServiceError::ListingNotFound { .. } => StatusCode::NOT_FOUND,

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_and_missing_listing_are_distinct_not_found_errors() {
        let invalid: HttpError = ServiceError::InvalidListingType("bogus".into()).into();
        let missing: HttpError = ServiceError::ListingNotFound {
            kind: ListingKind::Property,
            id: "3f1c".into(),
        }
        .into();

        assert_eq!(invalid.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_ne!(invalid.message, missing.message);
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let err: HttpError = ServiceError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, ErrorMessage::ServerError.to_string());
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ServiceError::Validation("listingType is required".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let http: HttpError = err.into();
        assert_eq!(http.message, "listingType is required");
    }
}
