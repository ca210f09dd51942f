//! Line Items

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_non_blank};

/// Prices must be representable in whole minor units.
pub const MAX_PRICE_SCALE: u32 = 2;

/// One product entry in a cart, with a quantity and a stock ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable identity used to merge repeated additions, usually product + variant.
    pub client_id: String,

    /// Opaque product identifier.
    #[serde(rename = "product")]
    pub product_ref: String,

    /// Display name
    pub name: String,

    /// Product URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Product category
    pub category: String,

    /// Price of a single unit.
    #[serde(rename = "price")]
    pub unit_price: Decimal,

    /// Number of units, always within `1..=stock_limit` once in a cart.
    pub quantity: u32,

    /// Upper bound for `quantity`.
    #[serde(rename = "countInStock")]
    pub stock_limit: u32,

    /// Product image reference
    #[serde(rename = "image", default)]
    pub image_ref: String,

    /// Variant size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Variant color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LineItem {
    /// Price of this line: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Check the structural rules every item must satisfy before it reaches pricing.
    ///
    /// Field names in the error use the wire names (`clientId`, `price`, ...).
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("clientId", &self.client_id)?;
        require_non_blank("product", &self.product_ref)?;
        require_non_blank("name", &self.name)?;
        require_non_blank("category", &self.category)?;

        validate_price("price", self.unit_price)?;

        if self.quantity == 0 {
            return Err(ValidationError::new("quantity", "must be at least 1"));
        }

        if self.stock_limit == 0 {
            return Err(ValidationError::new("countInStock", "item is out of stock"));
        }

        Ok(())
    }

    /// Clamp `quantity` into `1..=stock_limit`.
    pub(crate) fn clamp_quantity(&mut self) {
        self.quantity = self.quantity.clamp(1, self.stock_limit.max(1));
    }
}

fn validate_price(field: &str, price: Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(ValidationError::new(
            field,
            "must not have more than 2 decimal places",
        ));
    }

    Ok(())
}

/// An untrusted line item as submitted by a client.
///
/// Missing fields and out-of-range numbers (negative quantity, quantity above stock) surface as
/// a [`ValidationError`] naming the field. A field of the wrong JSON type, such as a quoted
/// `"quantity"`, still fails decoding. Client-side price summaries are not part of this shape
/// and are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    /// See [`LineItem::client_id`].
    #[serde(default)]
    pub client_id: String,

    /// See [`LineItem::product_ref`].
    #[serde(default)]
    pub product: String,

    /// See [`LineItem::name`].
    #[serde(default)]
    pub name: String,

    /// See [`LineItem::slug`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// See [`LineItem::category`].
    #[serde(default)]
    pub category: String,

    /// See [`LineItem::unit_price`].
    #[serde(default)]
    pub price: Option<Decimal>,

    /// See [`LineItem::quantity`].
    #[serde(default)]
    pub quantity: Option<i64>,

    /// See [`LineItem::stock_limit`].
    #[serde(default)]
    pub count_in_stock: Option<i64>,

    /// See [`LineItem::image_ref`].
    #[serde(default)]
    pub image: String,

    /// See [`LineItem::size`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// See [`LineItem::color`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TryFrom<LineItemInput> for LineItem {
    type Error = ValidationError;

    fn try_from(input: LineItemInput) -> Result<Self, Self::Error> {
        require_non_blank("clientId", &input.client_id)?;
        require_non_blank("product", &input.product)?;
        require_non_blank("name", &input.name)?;
        require_non_blank("category", &input.category)?;

        let unit_price = input.price.ok_or_else(|| ValidationError::required("price"))?;

        validate_price("price", unit_price)?;

        let quantity = input
            .quantity
            .ok_or_else(|| ValidationError::required("quantity"))?;

        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| ValidationError::new("quantity", "must be a positive integer"))?;

        let stock_limit = input
            .count_in_stock
            .ok_or_else(|| ValidationError::required("countInStock"))?;

        let stock_limit = u32::try_from(stock_limit).map_err(|_overflow| {
            ValidationError::new("countInStock", "must be a non-negative integer")
        })?;

        if quantity > stock_limit {
            return Err(ValidationError::new("quantity", "exceeds available stock"));
        }

        let item = LineItem {
            client_id: input.client_id,
            product_ref: input.product,
            name: input.name,
            slug: input.slug,
            category: input.category,
            unit_price,
            quantity,
            stock_limit,
            image_ref: input.image,
            size: input.size,
            color: input.color,
        };

        item.validate()?;

        Ok(item)
    }
}

/// Validate submitted items in order, prefixing the first failure with `items[i]`.
///
/// A `clientId` may appear only once: the cart merges repeats into one line, so a submission
/// that repeats one was not produced by a cart and would be priced differently from it.
///
/// # Errors
///
/// Returns the first failing item field as a [`ValidationError`].
pub fn validate_items(
    inputs: impl IntoIterator<Item = LineItemInput>,
) -> Result<Vec<LineItem>, ValidationError> {
    let mut seen = HashSet::new();

    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let parent = format!("items[{i}]");
            let item = LineItem::try_from(input).map_err(|error| error.within(&parent))?;

            if !seen.insert(item.client_id.clone()) {
                return Err(ValidationError::new("clientId", "duplicate item").within(&parent));
            }

            Ok(item)
        })
        .collect()
}

impl From<LineItem> for LineItemInput {
    fn from(item: LineItem) -> Self {
        Self {
            client_id: item.client_id,
            product: item.product_ref,
            name: item.name,
            slug: item.slug,
            category: item.category,
            price: Some(item.unit_price),
            quantity: Some(i64::from(item.quantity)),
            count_in_stock: Some(i64::from(item.stock_limit)),
            image: item.image_ref,
            size: item.size,
            color: item.color,
        }
    }
}
