//! Test Helpers

use fairway::{
    address::ShippingAddress,
    items::LineItem,
    metadata::{OrderSnapshot, SnapshotError},
    pricing::reconcile,
};
use rust_decimal::Decimal;

use crate::payments::models::{CheckoutSession, CustomerDetails, PaymentStatus};

/// A disc priced in cents with the given stock ceiling.
pub(crate) fn disc(client_id: &str, cents: i64, quantity: u32, stock_limit: u32) -> LineItem {
    LineItem {
        client_id: client_id.to_string(),
        product_ref: format!("product-{client_id}"),
        name: format!("Disc {client_id}"),
        slug: Some(client_id.to_string()),
        category: "Drivers".to_string(),
        unit_price: Decimal::new(cents, 2),
        quantity,
        stock_limit,
        image_ref: "/images/disc.jpg".to_string(),
        size: None,
        color: None,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Paige Pierce".to_string(),
        street: "1 Basket Lane".to_string(),
        city: "Emporia".to_string(),
        postal_code: "K1A 0B1".to_string(),
        province: "ON".to_string(),
        phone: "555-0100".to_string(),
        country: "Canada".to_string(),
    }
}

/// A paid session carrying a snapshot of `items`, as the provider would report it.
pub(crate) fn paid_session(id: &str, items: &[LineItem]) -> Result<CheckoutSession, SnapshotError> {
    let snapshot = OrderSnapshot {
        items: items.to_vec(),
        shipping_address: shipping_address(),
        prices: reconcile(items),
    };

    Ok(CheckoutSession {
        id: id.to_string(),
        url: None,
        payment_status: PaymentStatus::Paid,
        payment_intent: Some(format!("pi_{id}")),
        customer_details: Some(CustomerDetails::default()),
        customer_email: None,
        amount_total: None,
        metadata: snapshot.encode()?,
    })
}
