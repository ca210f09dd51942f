//! Donation Errors

use salvo::http::StatusCode;
use tracing::error;

use fairway_app::domain::donations::DonationsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: DonationsServiceError) -> ApiError {
    match error {
        DonationsServiceError::Validation(source) => source.into(),
        DonationsServiceError::AlreadyExists => ApiError::conflict("donation already exists"),
        DonationsServiceError::NotFound => ApiError::not_found("donation not found"),
        DonationsServiceError::InvalidData => {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid donation")
        }
        DonationsServiceError::Sql(source) => {
            error!("failed to store donation: {source}");

            ApiError::internal()
        }
    }
}
