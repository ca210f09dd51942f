//! Test support for service-level integration tests.

mod context;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
