//! Per-request span, `x-request-id` round-trip and completion logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, field::Empty, info, info_span, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Probe and scrape endpoints pass straight through.
const UNTRACED_PATHS: &[&str] = &["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let path = req.uri().path().to_owned();

    if UNTRACED_PATHS.contains(&path.as_str()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let names = spans::request_span_name(&method, &path);

    let span = info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        status = Empty,
        duration_ms = Empty,
    );

    if settings::trust_remote_parent()
        && let Some(parent) = parent_context::remote_parent(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to attach remote parent to request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);

    metrics::observe_request(
        &method,
        &names.otel_path,
        status.as_u16(),
        elapsed.as_secs_f64(),
    );

    log_completion(
        &span,
        status,
        elapsed.as_millis(),
        u128::from(settings::slow_request_threshold_ms()),
    );
}

/// How a finished request should be reported beyond the routine completion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Routine,
    ClientError,
    ServerError,
}

impl Severity {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Routine
        }
    }
}

fn log_completion(span: &Span, status: StatusCode, duration_ms: u128, threshold_ms: u128) {
    let code = status.as_u16();

    span.record("status", code);
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = code, duration_ms, "request.completed");

        match Severity::of(status) {
            Severity::ServerError => error!(status = code, "server error response"),
            Severity::ClientError => warn!(status = code, "client error response"),
            Severity::Routine => {}
        }

        if duration_ms > threshold_ms {
            warn!(duration_ms, threshold_ms, "slow request detected");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_status_class() {
        assert_eq!(Severity::of(StatusCode::CREATED), Severity::Routine);
        assert_eq!(Severity::of(StatusCode::NOT_FOUND), Severity::ClientError);
        assert_eq!(Severity::of(StatusCode::UNPROCESSABLE_ENTITY), Severity::ClientError);
        assert_eq!(Severity::of(StatusCode::BAD_GATEWAY), Severity::ServerError);
    }

    #[test]
    fn probes_are_untraced() {
        assert!(UNTRACED_PATHS.contains(&"/healthcheck"), "healthcheck skipped");
        assert!(!UNTRACED_PATHS.contains(&"/orders"), "api routes traced");
    }
}
