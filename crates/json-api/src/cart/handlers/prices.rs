//! Cart Price Preview Handler

use fairway::{
    items::{LineItemInput, validate_items},
    pricing::{PriceBreakdown, reconcile},
};
use salvo::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ApiError;

/// Price Preview Request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PricePreviewRequest {
    pub items: Vec<LineItemInput>,
}

/// Price Preview Handler
///
/// Prices the submitted items exactly as checkout would, without creating anything. An empty
/// list prices to zero.
#[handler]
pub(crate) async fn handler(req: &mut Request) -> Result<Json<PriceBreakdown>, ApiError> {
    let request: PricePreviewRequest = req.parse_json().await?;

    let items = validate_items(request.items)?;
    let prices = reconcile(&items);

    debug!(items = items.len(), total_price = %prices.total_price, "priced cart");

    Ok(Json(prices))
}
