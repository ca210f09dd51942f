//! Order Models

use fairway::{address::ShippingAddress, items::LineItem, pricing::PriceBreakdown};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Email recorded when the provider reports none.
pub const GUEST_EMAIL: &str = "guest@checkout.com";

/// Payment method recorded for hosted checkout orders.
pub const PAYMENT_METHOD: &str = "Stripe";

/// Days between payment and expected delivery.
pub const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub session_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_intent: Option<String>,
    pub payment_status: String,
    pub prices: PriceBreakdown,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub expected_delivery_date: Option<Timestamp>,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Number of distinct line items.
    pub fn items_count(&self) -> usize {
        self.items.len()
    }
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub session_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_intent: Option<String>,
    pub payment_status: String,
    pub prices: PriceBreakdown,
    pub paid_at: Timestamp,
    pub expected_delivery_date: Timestamp,
}

/// Outcome of confirming a paid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order: Order,

    /// `false` when the order already existed for the session.
    pub created: bool,
}
