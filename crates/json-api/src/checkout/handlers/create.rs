//! Create Checkout Session Handler

use std::sync::Arc;

use fairway::checkout::CheckoutRequest;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{Instrument as _, info_span};

use crate::{
    checkout::errors::into_api_error, errors::ApiError, extensions::*,
    observability::record_checkout_session, state::State,
};

/// Checkout Created Response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutCreatedResponse {
    /// Hosted checkout page to send the customer to
    pub url: String,

    /// Provider session id, used to confirm the order afterwards
    pub session_id: String,
}

/// Create Checkout Session Handler
///
/// Client prices are never read: the submission is validated and re-priced before a hosted
/// payment session is opened.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CheckoutCreatedResponse>, ApiError> {
    let request: CheckoutRequest = req.parse_json().await?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let span = info_span!("checkout.create", items = request.items.len());

    let created = state
        .app
        .checkout
        .create_session(request)
        .instrument(span)
        .await
        .map_err(into_api_error)?;

    record_checkout_session();

    Ok(Json(CheckoutCreatedResponse {
        url: created.url,
        session_id: created.session_id,
    }))
}
