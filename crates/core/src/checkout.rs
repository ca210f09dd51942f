//! Checkout
//!
//! The authoritative boundary. Client submissions are validated field by field and priced from
//! scratch; any price summary the client computed is never read.

use serde::{Deserialize, Serialize};

use crate::{
    address::ShippingAddress,
    cart::Cart,
    items::{LineItem, LineItemInput, validate_items},
    pricing::{PriceBreakdown, reconcile},
    validation::{ValidationError, require_email},
};

/// A checkout submission as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Line items to purchase.
    #[serde(default)]
    pub items: Vec<LineItemInput>,

    /// Where to ship the order.
    #[serde(default)]
    pub shipping_address: ShippingAddress,

    /// Optional receipt email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CheckoutRequest {
    /// Build a submission from a client cart. Only the items travel; prices are recomputed.
    pub fn from_cart(cart: &Cart, shipping_address: ShippingAddress, email: Option<String>) -> Self {
        Self {
            items: cart.items().iter().cloned().map(LineItemInput::from).collect(),
            shipping_address,
            email,
        }
    }

    /// Validate the submission and compute authoritative prices.
    ///
    /// Rules are checked in order and the first failure wins: the item list must not be empty,
    /// each item must be valid (`items[i].<field>`), the shipping address must be complete
    /// (`shippingAddress.<field>`), and a supplied email must look like an address.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule as a [`ValidationError`].
    pub fn validate(self) -> Result<ValidatedCheckout, ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::new("items", "at least one item is required"));
        }

        let items = validate_items(self.items)?;

        self.shipping_address
            .validate()
            .map_err(|error| error.within("shippingAddress"))?;

        let email = self
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        if let Some(email) = &email {
            require_email("email", email)?;
        }

        let prices = reconcile(&items);

        Ok(ValidatedCheckout {
            items,
            shipping_address: self.shipping_address,
            email,
            prices,
        })
    }
}

/// A checkout that passed validation, with server-computed prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    /// Validated items, in submission order.
    pub items: Vec<LineItem>,

    /// Validated shipping address.
    pub shipping_address: ShippingAddress,

    /// Receipt email, if one was supplied.
    pub email: Option<String>,

    /// Authoritative prices.
    pub prices: PriceBreakdown,
}

impl ValidatedCheckout {
    /// Total number of units being purchased.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
