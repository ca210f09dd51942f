//! Payment Provider Webhooks

mod errors;
mod handlers;

pub(crate) use handlers::*;
