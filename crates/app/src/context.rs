//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        checkout::{CheckoutService, HostedCheckoutService, models::CheckoutSettings},
        donations::{DonationsService, PgDonationsService},
        orders::{OrdersService, PgOrdersService},
    },
    payments::{PaymentProvider, StripeClient, StripeConfig, WebhookVerifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Payment provider settings.
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub stripe: StripeConfig,
    pub webhook_secret: String,
    pub webhook_tolerance_seconds: u64,
    pub checkout: CheckoutSettings,
}

/// Services shared by every request, built once by the process entry point.
#[derive(Clone)]
pub struct AppContext {
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub donations: Arc<dyn DonationsService>,
    pub webhooks: Arc<WebhookVerifier>,
}

impl AppContext {
    /// Build application context from a database URL and payment settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        payments: PaymentSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let provider: Arc<dyn PaymentProvider> = Arc::new(StripeClient::new(payments.stripe));

        Ok(Self {
            checkout: Arc::new(HostedCheckoutService::new(
                Arc::clone(&provider),
                payments.checkout,
            )),
            orders: Arc::new(PgOrdersService::new(db.clone(), provider)),
            donations: Arc::new(PgDonationsService::new(db)),
            webhooks: Arc::new(WebhookVerifier::new(
                payments.webhook_secret,
                payments.webhook_tolerance_seconds,
            )),
        })
    }
}
