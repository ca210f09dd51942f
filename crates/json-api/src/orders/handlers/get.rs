//! Get Order Handler

use std::sync::Arc;

use fairway::{address::ShippingAddress, items::LineItem, pricing::PriceBreakdown};
use fairway_app::domain::orders::models::{Order, OrderUuid};
use jiff::Timestamp;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, orders::errors::into_api_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub order_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_status: String,
    #[serde(flatten)]
    pub prices: PriceBreakdown,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub expected_delivery_date: Option<Timestamp>,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.uuid.into_uuid(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            items: order.items,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            prices: order.prices,
            is_paid: order.is_paid,
            paid_at: order.paid_at,
            expected_delivery_date: order.expected_delivery_date,
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at,
            created_at: order.created_at,
        }
    }
}

/// Get Order Handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = req
        .param::<Uuid>("order")
        .map(OrderUuid::from_uuid)
        .ok_or_else(|| ApiError::bad_request("order: must be a uuid"))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order)
        .await
        .map_err(into_api_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use fairway_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_order, make_service};

    use super::*;

    fn make_orders_service(orders: MockOrdersService) -> Service {
        make_service(
            Mocks::with_orders(orders),
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let order = make_order("cs_test_1");
        let uuid = order.uuid;

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_orders_service(orders))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["orderId"], uuid.to_string());
        assert_eq!(body["totalPrice"], "64.00");
        assert_eq!(body["paymentMethod"], "Stripe");
        assert_eq!(body["isPaid"], true);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_not_found_returns_404() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_orders_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_invalid_uuid_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/not-a-uuid")
            .send(&make_orders_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
