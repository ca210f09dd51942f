//! Orders Repository

use fairway::{
    address::ShippingAddress,
    items::LineItem,
    money::to_minor_units,
    pricing::PriceBreakdown,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::orders::models::{NewOrder, Order, OrderUuid, PAYMENT_METHOD};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const FIND_ORDER_BY_SESSION_SQL: &str = include_str!("sql/find_order_by_session.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order unless one already exists for its session. Returns `None` on conflict.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.session_id)
            .bind(&order.customer_name)
            .bind(&order.customer_email)
            .bind(Json(&order.items))
            .bind(Json(&order.shipping_address))
            .bind(PAYMENT_METHOD)
            .bind(order.payment_intent.as_deref())
            .bind(&order.payment_status)
            .bind(minor_units(order.prices.items_price)?)
            .bind(minor_units(order.prices.tax_price)?)
            .bind(minor_units(order.prices.shipping_price)?)
            .bind(minor_units(order.prices.total_price)?)
            .bind(SqlxTimestamp::from(order.paid_at))
            .bind(SqlxTimestamp::from(order.expected_delivery_date))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(FIND_ORDER_BY_SESSION_SQL)
            .bind(session_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

fn minor_units(amount: Decimal) -> Result<i64, sqlx::Error> {
    to_minor_units(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(items) = row.try_get::<Json<Vec<LineItem>>, _>("items")?;
        let Json(shipping_address) = row.try_get::<Json<ShippingAddress>, _>("shipping_address")?;

        let prices = PriceBreakdown {
            items_price: Decimal::new(row.try_get("items_price")?, 2),
            tax_price: Decimal::new(row.try_get("tax_price")?, 2),
            shipping_price: Decimal::new(row.try_get("shipping_price")?, 2),
            total_price: Decimal::new(row.try_get("total_price")?, 2),
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            session_id: row.try_get("session_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            items,
            shipping_address,
            payment_method: row.try_get("payment_method")?,
            payment_intent: row.try_get("payment_intent")?,
            payment_status: row.try_get("payment_status")?,
            prices,
            is_paid: row.try_get("is_paid")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            expected_delivery_date: row
                .try_get::<Option<SqlxTimestamp>, _>("expected_delivery_date")?
                .map(SqlxTimestamp::to_jiff),
            is_delivered: row.try_get("is_delivered")?,
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
