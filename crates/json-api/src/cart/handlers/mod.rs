//! Cart Handlers

pub(crate) mod prices;
