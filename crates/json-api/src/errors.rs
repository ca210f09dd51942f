//! JSON error responses.
//!
//! Every failure leaves the server as `{ "error": "<message>" }` with a matching status code.

use fairway::ValidationError;
use salvo::{
    http::{ParseError, StatusCode},
    prelude::{Json, Response},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    /// What went wrong. Validation failures read `<field>: <message>`.
    pub error: String,
}

/// An error rendered as an [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// The payment provider failed; the caller may retry.
    pub(crate) fn bad_gateway() -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            "payment provider unavailable, please try again",
        )
    }

    pub(crate) fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "something went wrong, please try again",
        )
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl From<ParseError> for ApiError {
    fn from(error: ParseError) -> Self {
        Self::bad_request(format!("malformed request body: {error}"))
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            error: self.message,
        }));
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn invalid() -> Result<Json<ErrorResponse>, ApiError> {
        Err(ValidationError::new("items[0].price", "must not be negative").into())
    }

    #[tokio::test]
    async fn validation_errors_render_field_and_message() -> TestResult {
        let service = Service::new(Router::with_path("invalid").get(invalid));

        let mut res = TestClient::get("http://example.com/invalid")
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error, "items[0].price: must not be negative");

        Ok(())
    }

    #[test]
    fn upstream_errors_are_generic() {
        assert_eq!(ApiError::bad_gateway().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::internal().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!ApiError::internal().message().contains("sql"));
    }
}
