//! Donation Handlers

pub(crate) mod create;
