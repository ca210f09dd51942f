//! Fairway
//!
//! Cart pricing and reconciliation for the Fairway disc golf store. The same price reconciler
//! backs the optimistic, client-side cart preview and the authoritative server-side checkout, so
//! both always agree on what a list of line items costs.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod items;
pub mod metadata;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod store;
pub mod validation;

pub use validation::ValidationError;
