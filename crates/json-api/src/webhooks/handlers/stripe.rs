//! Stripe Webhook Handler

use std::sync::Arc;

use fairway_app::payments::webhook::SIGNATURE_HEADER;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{Instrument as _, debug, info_span};

use crate::{
    errors::ApiError, extensions::*, observability::record_order_confirmation,
    orders::errors::into_api_error as order_api_error, state::State,
    webhooks::errors::into_api_error,
};

/// Webhook Received Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WebhookReceivedResponse {
    pub received: bool,
}

/// Stripe Webhook Handler
///
/// Verifies the signature over the raw body before anything is decoded. Completed, paid
/// checkout sessions are recorded as orders through the same path as customer confirmation;
/// every other verified event is acknowledged and ignored.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookReceivedResponse>, ApiError> {
    let signature = req
        .header::<String>(SIGNATURE_HEADER)
        .ok_or_else(|| ApiError::bad_request(format!("missing {SIGNATURE_HEADER} header")))?;

    let payload = req.payload().await?.clone();
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let event = state
        .app
        .webhooks
        .construct_event(&payload, &signature)
        .map_err(into_api_error)?;

    let span = info_span!("webhooks.stripe", event_id = %event.id, event_type = %event.event_type);

    let Some(session) = event.completed_session().map_err(into_api_error)? else {
        span.in_scope(|| debug!("ignoring webhook event"));

        return Ok(Json(WebhookReceivedResponse { received: true }));
    };

    let confirmation = state
        .app
        .orders
        .record_completed_session(session)
        .instrument(span)
        .await
        .map_err(order_api_error)?;

    if let Some(confirmation) = confirmation {
        record_order_confirmation(confirmation.created);
    }

    Ok(Json(WebhookReceivedResponse { received: true }))
}
