//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use fairway::{
    checkout::{CheckoutRequest, ValidatedCheckout},
    metadata::OrderSnapshot,
    money::{MoneyConversionError, to_minor_units},
};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    domain::checkout::{
        errors::CheckoutServiceError,
        models::{CheckoutSettings, CreatedCheckout},
    },
    payments::{
        PaymentProvider, PaymentsError,
        models::{NewCheckoutSession, SessionLineItem},
    },
};

/// Checkout backed by the payment provider's hosted checkout page.
#[derive(Clone)]
pub struct HostedCheckoutService {
    payments: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl HostedCheckoutService {
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentProvider>, settings: CheckoutSettings) -> Self {
        Self { payments, settings }
    }

    fn line_items(
        &self,
        checkout: &ValidatedCheckout,
    ) -> Result<Vec<SessionLineItem>, MoneyConversionError> {
        let mut lines = checkout
            .items
            .iter()
            .map(|item| {
                Ok(SessionLineItem {
                    name: item.name.clone(),
                    images: self
                        .settings
                        .absolute_image(&item.image_ref)
                        .into_iter()
                        .collect(),
                    currency: self.settings.currency.clone(),
                    unit_amount: to_minor_units(item.unit_price)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, MoneyConversionError>>()?;

        for (name, amount) in [
            ("Shipping", checkout.prices.shipping_price),
            ("Tax", checkout.prices.tax_price),
        ] {
            if amount > Decimal::ZERO {
                lines.push(self.fee_line(name, amount)?);
            }
        }

        Ok(lines)
    }

    fn fee_line(&self, name: &str, amount: Decimal) -> Result<SessionLineItem, MoneyConversionError> {
        Ok(SessionLineItem {
            name: name.to_string(),
            images: Vec::new(),
            currency: self.settings.currency.clone(),
            unit_amount: to_minor_units(amount)?,
            quantity: 1,
        })
    }
}

#[async_trait]
impl CheckoutService for HostedCheckoutService {
    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CreatedCheckout, CheckoutServiceError> {
        let checkout = request.validate()?;

        let session = NewCheckoutSession {
            line_items: self.line_items(&checkout)?,
            success_url: self.settings.success_url(),
            cancel_url: self.settings.cancel_url(),
            customer_email: checkout.email.clone(),
            metadata: OrderSnapshot::from(&checkout).encode()?,
        };

        let created = self.payments.create_session(session).await?;

        let url = created.url.ok_or_else(|| {
            PaymentsError::UnexpectedResponse("checkout session has no url".to_string())
        })?;

        info!(
            session_id = %created.id,
            items = checkout.items.len(),
            total_price = %checkout.prices.total_price,
            "created checkout session"
        );

        Ok(CreatedCheckout {
            session_id: created.id,
            url,
            prices: checkout.prices,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate a checkout submission, price it, and open a hosted payment session.
    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CreatedCheckout, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use fairway::{
        address::ShippingAddress,
        items::{LineItem, LineItemInput},
        metadata::OrderSnapshot,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        payments::{
            MockPaymentProvider,
            models::{CheckoutSession, PaymentStatus},
        },
        test::helpers::{disc, shipping_address},
    };

    use super::*;

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            public_origin: "https://fairway.example".to_string(),
            currency: "cad".to_string(),
        }
    }

    fn request(items: Vec<LineItem>, address: ShippingAddress) -> CheckoutRequest {
        CheckoutRequest {
            items: items.into_iter().map(LineItemInput::from).collect(),
            shipping_address: address,
            email: Some("ace@fairway.example".to_string()),
        }
    }

    fn open_session(id: &str) -> CheckoutSession {
        CheckoutSession {
            id: id.to_string(),
            url: Some(format!("https://checkout.example/{id}")),
            payment_status: PaymentStatus::Unpaid,
            payment_intent: None,
            customer_details: None,
            customer_email: None,
            amount_total: None,
            metadata: fairway::metadata::Metadata::new(),
        }
    }

    #[tokio::test]
    async fn small_orders_get_shipping_and_tax_lines() -> TestResult {
        let mut payments = MockPaymentProvider::new();

        payments
            .expect_create_session()
            .once()
            .withf(|session| {
                let names: Vec<_> = session.line_items.iter().map(|l| l.name.as_str()).collect();
                let amounts: Vec<_> = session.line_items.iter().map(|l| l.unit_amount).collect();

                names == ["Disc a", "Shipping", "Tax"]
                    && amounts == [25_00, 10_00, 2_00]
                    && session.line_items.iter().all(|line| line.currency == "cad")
                    && session.customer_email.as_deref() == Some("ace@fairway.example")
                    && session.cancel_url == "https://fairway.example/checkout"
            })
            .return_once(|_| Ok(open_session("cs_1")));

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        let created = service
            .create_session(request(vec![disc("a", 25_00, 1, 5)], shipping_address()))
            .await?;

        assert_eq!(created.session_id, "cs_1");
        assert_eq!(created.url, "https://checkout.example/cs_1");
        assert_eq!(created.prices.total_price, Decimal::new(37_00, 2));

        Ok(())
    }

    #[tokio::test]
    async fn large_orders_ship_free() -> TestResult {
        let mut payments = MockPaymentProvider::new();

        payments
            .expect_create_session()
            .once()
            .withf(|session| {
                session
                    .line_items
                    .iter()
                    .map(|line| line.name.as_str())
                    .eq(["Disc a", "Tax"])
            })
            .return_once(|_| Ok(open_session("cs_2")));

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        service
            .create_session(request(vec![disc("a", 100_01, 1, 5)], shipping_address()))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_is_attached_as_metadata() -> TestResult {
        let mut payments = MockPaymentProvider::new();

        payments
            .expect_create_session()
            .once()
            .withf(|session| {
                OrderSnapshot::decode(&session.metadata).is_ok_and(|snapshot| {
                    snapshot.is_consistent()
                        && snapshot.items.len() == 2
                        && snapshot.shipping_address.full_name == "Paige Pierce"
                })
            })
            .return_once(|_| Ok(open_session("cs_3")));

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        service
            .create_session(request(
                vec![disc("a", 21_99, 2, 5), disc("b", 17_49, 1, 3)],
                shipping_address(),
            ))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn images_are_sent_as_absolute_urls() -> TestResult {
        let mut payments = MockPaymentProvider::new();

        payments
            .expect_create_session()
            .once()
            .withf(|session| {
                session.line_items.first().is_some_and(|line| {
                    line.images == ["https://fairway.example/images/disc.jpg"]
                })
            })
            .return_once(|_| Ok(open_session("cs_4")));

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        service
            .create_session(request(vec![disc("a", 10_00, 1, 5)], shipping_address()))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_provider() {
        let mut payments = MockPaymentProvider::new();

        payments.expect_create_session().never();

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        let result = service
            .create_session(request(vec![], shipping_address()))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::Validation(ref error)) if error.field() == "items"),
            "expected validation error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn provider_failures_are_reported() {
        let mut payments = MockPaymentProvider::new();

        payments.expect_create_session().once().return_once(|_| {
            Err(PaymentsError::Provider {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        let result = service
            .create_session(request(vec![disc("a", 10_00, 1, 5)], shipping_address()))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::Payments(_))),
            "expected payments error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn sessions_without_url_are_rejected() {
        let mut payments = MockPaymentProvider::new();

        payments.expect_create_session().once().return_once(|_| {
            let mut session = open_session("cs_5");
            session.url = None;
            Ok(session)
        });

        let service = HostedCheckoutService::new(Arc::new(payments), settings());

        let result = service
            .create_session(request(vec![disc("a", 10_00, 1, 5)], shipping_address()))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Payments(PaymentsError::UnexpectedResponse(_)))
            ),
            "expected unexpected response, got {result:?}"
        );
    }
}
