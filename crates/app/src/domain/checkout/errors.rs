//! Checkout service errors.

use fairway::{ValidationError, metadata::SnapshotError, money::MoneyConversionError};
use thiserror::Error;

use crate::payments::PaymentsError;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("amount cannot be charged")]
    InvalidAmount(#[from] MoneyConversionError),

    #[error("failed to encode order snapshot")]
    Snapshot(#[from] SnapshotError),

    #[error("payment provider error")]
    Payments(#[from] PaymentsError),
}
