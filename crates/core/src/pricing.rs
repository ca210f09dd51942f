//! Prices
//!
//! The single price reconciler. The client cart calls it to render a preview and the checkout
//! boundary calls it to decide what is charged; both must produce identical breakdowns, so the
//! rounding rule and the order of operations below are part of the contract.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::items::LineItem;

/// Sales tax applied to the items subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Flat shipping charge for subtotals at or below the threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::TEN;

/// Number of fractional digits every monetary amount is rounded to.
pub const PRICE_SCALE: u32 = 2;

/// The four derived monetary fields of a cart or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Sum of unit price times quantity over all items.
    pub items_price: Decimal,

    /// Tax on the items subtotal.
    pub tax_price: Decimal,

    /// Shipping charge.
    pub shipping_price: Decimal,

    /// Items + tax + shipping.
    pub total_price: Decimal,
}

impl PriceBreakdown {
    /// The breakdown of an empty cart.
    pub fn zero() -> Self {
        Self {
            items_price: round2(Decimal::ZERO),
            tax_price: round2(Decimal::ZERO),
            shipping_price: round2(Decimal::ZERO),
            total_price: round2(Decimal::ZERO),
        }
    }
}

impl Default for PriceBreakdown {
    fn default() -> Self {
        Self::zero()
    }
}

/// Round half away from zero to two decimal places, always keeping exactly two fractional digits.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(PRICE_SCALE);

    rounded
}

/// Shipping charge for a given items subtotal.
pub fn shipping_for(items_price: Decimal) -> Decimal {
    if items_price > FREE_SHIPPING_THRESHOLD {
        round2(Decimal::ZERO)
    } else {
        round2(FLAT_SHIPPING)
    }
}

/// Compute the price breakdown for a sequence of line items.
///
/// Total over any structurally valid input; callers reject malformed items (negative prices,
/// zero quantities) before getting here.
pub fn reconcile(items: &[LineItem]) -> PriceBreakdown {
    if items.is_empty() {
        return PriceBreakdown::zero();
    }

    let items_price = round2(
        items
            .iter()
            .fold(Decimal::ZERO, |total, item| {
                total.saturating_add(item.line_total())
            }),
    );

    let tax_price = round2(items_price.saturating_mul(TAX_RATE));
    let shipping_price = shipping_for(items_price);

    let total_price = round2(
        items_price
            .saturating_add(tax_price)
            .saturating_add(shipping_price),
    );

    PriceBreakdown {
        items_price,
        tax_price,
        shipping_price,
        total_price,
    }
}
