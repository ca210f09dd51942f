//! Payments Config

use clap::Args;
use fairway::money::{DEFAULT_CURRENCY_CODE, MoneyConversionError};
use fairway_app::{
    context::PaymentSettings, domain::checkout::models::CheckoutSettings, payments::StripeConfig,
};

/// Hosted checkout and webhook settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: String,

    /// Signing secret of the Stripe webhook endpoint
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: String,

    /// Stripe API base URL
    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    pub stripe_api_base: String,

    /// Public origin of the storefront, used for checkout redirects and image URLs
    #[arg(long, env = "PUBLIC_ORIGIN")]
    pub public_origin: String,

    /// ISO code of the currency charged at checkout (CAD, USD, GBP or EUR)
    #[arg(long, env = "CHECKOUT_CURRENCY", default_value = DEFAULT_CURRENCY_CODE)]
    pub checkout_currency: String,

    /// Maximum age of a signed webhook event, in seconds
    #[arg(long, env = "WEBHOOK_TOLERANCE_SECONDS", default_value_t = 300_u64)]
    pub webhook_tolerance_seconds: u64,
}

impl PaymentsConfig {
    /// Resolve into application settings, rejecting unsupported checkout currencies.
    pub(crate) fn into_settings(self) -> Result<PaymentSettings, MoneyConversionError> {
        let checkout = CheckoutSettings::new(self.public_origin, &self.checkout_currency)?;

        Ok(PaymentSettings {
            stripe: StripeConfig {
                api_base: self.stripe_api_base,
                secret_key: self.stripe_secret_key,
            },
            webhook_secret: self.stripe_webhook_secret,
            webhook_tolerance_seconds: self.webhook_tolerance_seconds,
            checkout,
        })
    }
}
