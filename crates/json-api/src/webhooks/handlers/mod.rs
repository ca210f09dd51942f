//! Webhook Handlers

pub(crate) mod stripe;
