//! Stripe Checkout client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::payments::{
    errors::PaymentsError,
    models::{CheckoutSession, NewCheckoutSession},
    provider::PaymentProvider,
};

/// Default API endpoint.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Configuration for talking to Stripe.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API base, e.g. `"https://api.stripe.com"`.
    pub api_base: String,

    /// Secret API key.
    pub secret_key: String,
}

/// HTTP client for Stripe Checkout sessions.
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: Client,
}

impl StripeClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentsError> {
        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.config.secret_key)
            .form(&session_form(&session))
            .send()
            .await?;

        let created: CheckoutSession = decode(response).await?;

        debug!(session_id = %created.id, "created checkout session");

        Ok(created)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentsError> {
        let response = self
            .http
            .get(format!("{}/{session_id}", self.sessions_url()))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        decode(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

async fn decode(response: Response) -> Result<CheckoutSession, PaymentsError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or(text);

        return Err(PaymentsError::Provider {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

/// Encode a session request as Stripe's bracketed form fields.
fn session_form(session: &NewCheckoutSession) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), session.success_url.clone()),
        ("cancel_url".to_string(), session.cancel_url.clone()),
    ];

    if let Some(email) = &session.customer_email {
        form.push(("customer_email".to_string(), email.clone()));
    }

    for (i, item) in session.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");

        form.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));

        for (j, image) in item.images.iter().enumerate() {
            form.push((
                format!("{prefix}[price_data][product_data][images][{j}]"),
                image.clone(),
            ));
        }

        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    for (key, value) in &session.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    form
}
