//! Orders service.
//!
//! Orders are created at most once per payment session. The session id is checked before the
//! provider is consulted, and the unique index on `orders.session_id` settles any race between
//! a customer confirmation and a provider webhook arriving together.

use std::sync::Arc;

use async_trait::async_trait;
use fairway::{metadata::OrderSnapshot, validation::require_non_blank};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{
            DELIVERY_WINDOW_DAYS, GUEST_EMAIL, NewOrder, Order, OrderConfirmation, OrderUuid,
        },
        repository::PgOrdersRepository,
    },
    payments::{PaymentProvider, models::CheckoutSession},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    payments: Arc<dyn PaymentProvider>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, payments: Arc<dyn PaymentProvider>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            payments,
        }
    }

    async fn find_existing(&self, session_id: &str) -> Result<Option<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.find_by_session(&mut tx, session_id).await?;

        tx.commit().await?;

        Ok(existing)
    }

    async fn record_paid_session(
        &self,
        session: &CheckoutSession,
    ) -> Result<OrderConfirmation, OrdersServiceError> {
        let snapshot = OrderSnapshot::decode(&session.metadata)?;

        if !snapshot.is_consistent() {
            warn!(
                session_id = %session.id,
                "stored prices differ from recomputed prices; recording prices as charged"
            );
        }

        let order = new_order(session, snapshot, Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        let confirmation = match self.repository.create_order(&mut tx, &order).await? {
            Some(order) => OrderConfirmation {
                order,
                created: true,
            },
            None => OrderConfirmation {
                order: self
                    .repository
                    .find_by_session(&mut tx, &session.id)
                    .await?
                    .ok_or(OrdersServiceError::NotFound)?,
                created: false,
            },
        };

        tx.commit().await?;

        if confirmation.created {
            info!(
                order_uuid = %confirmation.order.uuid,
                session_id = %session.id,
                total_price = %confirmation.order.prices.total_price,
                "created order"
            );
        } else {
            info!(session_id = %session.id, "order already recorded concurrently");
        }

        Ok(confirmation)
    }
}

/// Build the order to record for a paid session.
pub(crate) fn new_order(
    session: &CheckoutSession,
    snapshot: OrderSnapshot,
    paid_at: Timestamp,
) -> Result<NewOrder, OrdersServiceError> {
    let expected_delivery_date = paid_at
        .checked_add(SignedDuration::from_hours(DELIVERY_WINDOW_DAYS * 24))
        .map_err(OrdersServiceError::DeliveryDate)?;

    Ok(NewOrder {
        uuid: OrderUuid::new(),
        session_id: session.id.clone(),
        customer_name: snapshot.shipping_address.full_name.clone(),
        customer_email: session.customer_email().unwrap_or(GUEST_EMAIL).to_string(),
        items: snapshot.items,
        shipping_address: snapshot.shipping_address,
        payment_intent: session.payment_intent.clone(),
        payment_status: session.payment_status.as_str().to_string(),
        prices: snapshot.prices,
        paid_at,
        expected_delivery_date,
    })
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn confirm(&self, session_id: &str) -> Result<OrderConfirmation, OrdersServiceError> {
        require_non_blank("sessionId", session_id)?;

        if let Some(order) = self.find_existing(session_id).await? {
            return Ok(OrderConfirmation {
                order,
                created: false,
            });
        }

        let session = self.payments.retrieve_session(session_id).await?;

        if !session.is_paid() {
            return Err(OrdersServiceError::PaymentNotCompleted);
        }

        self.record_paid_session(&session).await
    }

    async fn record_completed_session(
        &self,
        session: CheckoutSession,
    ) -> Result<Option<OrderConfirmation>, OrdersServiceError> {
        if !session.is_paid() {
            info!(
                session_id = %session.id,
                payment_status = session.payment_status.as_str(),
                "ignoring unpaid session"
            );

            return Ok(None);
        }

        if let Some(order) = self.find_existing(&session.id).await? {
            return Ok(Some(OrderConfirmation {
                order,
                created: false,
            }));
        }

        self.record_paid_session(&session).await.map(Some)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn a paid checkout session into an order, or return the order already recorded for it.
    async fn confirm(&self, session_id: &str) -> Result<OrderConfirmation, OrdersServiceError>;

    /// Record the order for a session reported complete by a verified provider event.
    ///
    /// Unpaid sessions are acknowledged and ignored (`Ok(None)`).
    async fn record_completed_session(
        &self,
        session: CheckoutSession,
    ) -> Result<Option<OrderConfirmation>, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;
}
