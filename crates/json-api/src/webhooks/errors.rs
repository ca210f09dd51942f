//! Webhook Errors

use tracing::warn;

use fairway_app::payments::WebhookError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: WebhookError) -> ApiError {
    warn!("rejected webhook event: {error}");

    ApiError::bad_request(format!("Webhook Error: {error}"))
}
