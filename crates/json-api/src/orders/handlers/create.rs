//! Confirm Order Handler

use std::sync::Arc;

use fairway::address::ShippingAddress;
use fairway_app::domain::orders::models::Order;
use rust_decimal::Decimal;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{Instrument as _, info_span};
use uuid::Uuid;

use crate::{
    errors::ApiError, extensions::*, observability::record_order_confirmation,
    orders::errors::into_api_error, state::State,
};

/// Confirm Order Request
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ConfirmOrderRequest {
    /// Checkout session returned when checkout started
    pub session_id: String,
}

/// Order Confirmed Response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderConfirmedResponse {
    pub order_id: Uuid,
    pub total_price: Decimal,
    pub items_count: usize,
    pub shipping_address: ShippingAddress,
}

impl From<Order> for OrderConfirmedResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.uuid.into_uuid(),
            total_price: order.prices.total_price,
            items_count: order.items_count(),
            shipping_address: order.shipping_address,
        }
    }
}

/// Confirm Order Handler
///
/// Records the order for a paid checkout session. Confirming the same session again returns the
/// existing order with `200 OK`; a new order is `201 Created`.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderConfirmedResponse>, ApiError> {
    let request: ConfirmOrderRequest = req.parse_json().await?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let span = info_span!("orders.confirm", session_id = %request.session_id);

    let confirmation = state
        .app
        .orders
        .confirm(&request.session_id)
        .instrument(span)
        .await
        .map_err(into_api_error)?;

    record_order_confirmation(confirmation.created);

    if confirmation.created {
        res.status_code(StatusCode::CREATED);
    }

    Ok(Json(confirmation.order.into()))
}
