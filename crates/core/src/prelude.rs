//! Fairway Prelude

pub use crate::{
    address::ShippingAddress,
    cart::Cart,
    checkout::{CheckoutRequest, ValidatedCheckout},
    items::{LineItem, LineItemInput},
    metadata::{Metadata, OrderSnapshot, SnapshotError},
    pricing::{PriceBreakdown, reconcile},
    store::{CART_STORAGE_KEY, CartStore, FileCartStore, MemoryCartStore, PersistentCart},
    validation::ValidationError,
};
