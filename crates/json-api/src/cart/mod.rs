//! Cart

mod handlers;

pub(crate) use handlers::*;
