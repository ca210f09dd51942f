//! Payments
//!
//! Hosted checkout sessions with the payment provider and verification of the events it sends
//! back.

pub mod errors;
pub mod models;
mod provider;
mod stripe;
pub mod webhook;

pub use errors::PaymentsError;
pub use provider::*;
pub use stripe::{StripeClient, StripeConfig};
pub use webhook::{WebhookError, WebhookEvent, WebhookVerifier};
