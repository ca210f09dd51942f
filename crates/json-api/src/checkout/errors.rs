//! Checkout Errors

use tracing::{error, warn};

use fairway_app::domain::checkout::CheckoutServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CheckoutServiceError) -> ApiError {
    match error {
        CheckoutServiceError::Validation(source) => source.into(),
        CheckoutServiceError::InvalidAmount(source) => {
            warn!("checkout amount rejected: {source}");

            ApiError::bad_request(source.to_string())
        }
        CheckoutServiceError::Snapshot(source) => {
            error!("failed to encode order snapshot: {source}");

            ApiError::internal()
        }
        CheckoutServiceError::Payments(source) => {
            error!("failed to create checkout session: {source}");

            ApiError::bad_gateway()
        }
    }
}
