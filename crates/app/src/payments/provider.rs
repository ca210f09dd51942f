//! Payment provider seam.

use async_trait::async_trait;
use mockall::automock;

use crate::payments::{
    errors::PaymentsError,
    models::{CheckoutSession, NewCheckoutSession},
};

#[automock]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a hosted checkout session.
    async fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentsError>;

    /// Fetch the current state of a checkout session.
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentsError>;
}
