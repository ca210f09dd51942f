//! Donations

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::DonationsServiceError;
pub use service::*;
