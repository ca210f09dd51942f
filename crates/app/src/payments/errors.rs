//! Payments errors.

use thiserror::Error;

/// Errors talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// An HTTP transport or decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("payment provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider answered with something we could not use.
    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),
}
