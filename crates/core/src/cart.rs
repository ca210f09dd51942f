//! Cart
//!
//! The client-side cart aggregate. Every mutating method recomputes the price breakdown before
//! it returns, so a cart is never observed with prices that are stale relative to its items.

use serde::Serialize;

use crate::{
    items::LineItem,
    pricing::{PriceBreakdown, reconcile},
    validation::ValidationError,
};

/// An ordered collection of line items, unique by client id, with derived prices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,

    #[serde(flatten)]
    prices: PriceBreakdown,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart by adding each item in turn, merging repeated client ids.
    ///
    /// # Errors
    ///
    /// Returns the first item that fails validation, with its position in the field path.
    pub fn with_items(items: impl IntoIterator<Item = LineItem>) -> Result<Self, ValidationError> {
        let mut cart = Self::new();

        items.into_iter().enumerate().try_for_each(|(i, item)| {
            cart.add_item(item)
                .map_err(|error| error.within(&format!("items[{i}]")))
        })?;

        Ok(cart)
    }

    /// Add an item, merging with an existing entry of the same client id.
    ///
    /// On merge the quantity becomes `min(existing + incoming, incoming.stock_limit)`: the
    /// incoming stock limit is treated as the freshest truth. New entries are appended with their
    /// quantity clamped to their stock limit.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for structurally invalid items; the cart is left unchanged.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), ValidationError> {
        item.validate()?;

        match self
            .items
            .iter_mut()
            .find(|existing| existing.client_id == item.client_id)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(item.stock_limit);
                existing.stock_limit = item.stock_limit;
            }
            None => {
                let mut item = item;
                item.clamp_quantity();
                self.items.push(item);
            }
        }

        self.recompute();

        Ok(())
    }

    /// Remove the entry with the given client id. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, client_id: &str) {
        self.items.retain(|item| item.client_id != client_id);

        self.recompute();
    }

    /// Set the quantity of the entry with the given client id, clamped to `1..=stock_limit`.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, client_id: &str, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.client_id == client_id)
        {
            item.quantity = quantity;
            item.clamp_quantity();
        }

        self.recompute();
    }

    /// Reset to the empty cart.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Items in display (insertion) order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an entry by client id.
    pub fn get(&self, client_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.client_id == client_id)
    }

    /// Derived price breakdown for the current items.
    pub fn prices(&self) -> &PriceBreakdown {
        &self.prices
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all entries.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The items alone, for submission at checkout. Prices never leave the client.
    pub fn to_items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    fn recompute(&mut self) {
        self.prices = reconcile(&self.items);
    }
}
