//! Fairway application services: hosted checkout, order confirmation, donation intake and the
//! payment provider client they share.

pub mod context;
pub mod database;
pub mod domain;
pub mod payments;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
