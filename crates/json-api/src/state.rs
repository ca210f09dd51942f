//! Request-scoped access to the shared services.

use std::sync::Arc;

use fairway_app::context::AppContext;

/// Injected into the depot once per request by `affix_state`.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
