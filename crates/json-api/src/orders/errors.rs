//! Order Errors

use tracing::{error, warn};

use fairway_app::{domain::orders::OrdersServiceError, payments::PaymentsError};

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::Validation(source) => source.into(),
        OrdersServiceError::PaymentNotCompleted => {
            ApiError::bad_request("payment not completed")
        }
        OrdersServiceError::NotFound => ApiError::not_found("order not found"),
        OrdersServiceError::AlreadyExists => ApiError::conflict("order already exists"),
        OrdersServiceError::Payments(PaymentsError::Provider { status: 404, message }) => {
            warn!("checkout session not found: {message}");

            ApiError::not_found("checkout session not found")
        }
        OrdersServiceError::Payments(source) => {
            error!("failed to retrieve checkout session: {source}");

            ApiError::bad_gateway()
        }
        OrdersServiceError::InvalidSnapshot(source) => {
            error!("checkout session carries an unusable order snapshot: {source}");

            ApiError::internal()
        }
        OrdersServiceError::DeliveryDate(source) => {
            error!("failed to compute expected delivery date: {source}");

            ApiError::internal()
        }
        OrdersServiceError::InvalidData => {
            error!("order rejected by storage constraints");

            ApiError::internal()
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to store order: {source}");

            ApiError::internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn unknown_sessions_are_not_found() {
        let error = into_api_error(OrdersServiceError::Payments(PaymentsError::Provider {
            status: 404,
            message: "No such checkout.session".to_string(),
        }));

        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_provider_failures_are_bad_gateway() {
        let error = into_api_error(OrdersServiceError::Payments(
            PaymentsError::UnexpectedResponse("truncated".to_string()),
        ));

        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unpaid_sessions_are_bad_requests() {
        let error = into_api_error(OrdersServiceError::PaymentNotCompleted);

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "payment not completed");
    }

    #[test]
    fn constraint_failures_are_internal() {
        let error = into_api_error(OrdersServiceError::InvalidData);

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
