//! W3C `traceparent` extraction for inbound requests.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
};
use salvo::http::{HeaderMap, HeaderName};

/// Remote parent for the request span, if the caller sent a usable trace context.
pub(super) fn remote_parent(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| remote_parent_with(propagator, headers))
}

fn remote_parent_with(
    propagator: &dyn TextMapPropagator,
    headers: &HeaderMap,
) -> Option<Context> {
    // Extract onto an empty context so the current in-process span is never adopted.
    let context = propagator.extract_with_context(&Context::new(), &HeaderCarrier(headers));

    context
        .span()
        .span_context()
        .is_valid()
        .then_some(context)
}

struct HeaderCarrier<'a>(&'a HeaderMap);

impl Extractor for HeaderCarrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}
