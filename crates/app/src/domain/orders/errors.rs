//! Orders service errors.

use fairway::{ValidationError, metadata::SnapshotError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::payments::PaymentsError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("payment not completed")]
    PaymentNotCompleted,

    #[error("order snapshot in session metadata is invalid")]
    InvalidSnapshot(#[from] SnapshotError),

    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("invalid data")]
    InvalidData,

    #[error("delivery date out of range")]
    DeliveryDate(#[source] jiff::Error),

    #[error("payment provider error")]
    Payments(#[from] PaymentsError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
