//! Test helpers.

use std::sync::Arc;

use fairway::{address::ShippingAddress, items::LineItem, pricing::reconcile};
use fairway_app::{
    context::AppContext,
    domain::{
        checkout::MockCheckoutService,
        donations::MockDonationsService,
        orders::{
            MockOrdersService,
            models::{Order, OrderUuid, PAYMENT_METHOD},
        },
    },
    payments::WebhookVerifier,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use serde_json::{Value, json};

use crate::state::State;

pub(crate) const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Mocked services behind a test [`AppContext`]. Unconfigured mocks fail on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) checkout: MockCheckoutService,
    pub(crate) orders: MockOrdersService,
    pub(crate) donations: MockDonationsService,
}

impl Mocks {
    pub(crate) fn with_checkout(checkout: MockCheckoutService) -> Self {
        Self {
            checkout,
            ..Self::default()
        }
    }

    pub(crate) fn with_orders(orders: MockOrdersService) -> Self {
        Self {
            orders,
            ..Self::default()
        }
    }

    pub(crate) fn with_donations(donations: MockDonationsService) -> Self {
        Self {
            donations,
            ..Self::default()
        }
    }

    fn into_app_context(self) -> AppContext {
        AppContext {
            checkout: Arc::new(self.checkout),
            orders: Arc::new(self.orders),
            donations: Arc::new(self.donations),
            webhooks: Arc::new(verifier()),
        }
    }
}

pub(crate) fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(WEBHOOK_SECRET, 300)
}

pub(crate) fn make_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::shared(mocks.into_app_context())))
            .push(route),
    )
}

pub(crate) fn disc(client_id: &str, cents: i64, quantity: u32, stock_limit: u32) -> LineItem {
    LineItem {
        client_id: client_id.to_string(),
        product_ref: format!("product-{client_id}"),
        name: format!("Disc {client_id}"),
        slug: None,
        category: "Putters".to_string(),
        unit_price: Decimal::new(cents, 2),
        quantity,
        stock_limit,
        image_ref: "/images/putter.jpg".to_string(),
        size: None,
        color: None,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Eagle McMahon".to_string(),
        street: "9 Fairway Drive".to_string(),
        city: "Kelowna".to_string(),
        postal_code: "V1Y 1A1".to_string(),
        province: "BC".to_string(),
        phone: "555-0142".to_string(),
        country: "Canada".to_string(),
    }
}

/// A client line item as JSON, including client-side fields the server must ignore.
pub(crate) fn disc_json(client_id: &str, price: &str, quantity: u32, stock: u32) -> Value {
    json!({
        "clientId": client_id,
        "product": format!("product-{client_id}"),
        "name": format!("Disc {client_id}"),
        "category": "Putters",
        "price": price,
        "quantity": quantity,
        "countInStock": stock,
        "image": "/images/putter.jpg",
        "totalPrice": "0.01",
    })
}

/// A paid order with two lines worth 50.00, so 64.00 with tax and shipping.
pub(crate) fn make_order(session_id: &str) -> Order {
    let items = vec![disc("a", 20_00, 2, 5), disc("b", 10_00, 1, 3)];
    let now = Timestamp::now();

    Order {
        uuid: OrderUuid::new(),
        session_id: session_id.to_string(),
        customer_name: "Eagle McMahon".to_string(),
        customer_email: "eagle@fairway.example".to_string(),
        prices: reconcile(&items),
        items,
        shipping_address: shipping_address(),
        payment_method: PAYMENT_METHOD.to_string(),
        payment_intent: Some(format!("pi_{session_id}")),
        payment_status: "paid".to_string(),
        is_paid: true,
        paid_at: Some(now),
        expected_delivery_date: None,
        is_delivered: false,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    }
}
