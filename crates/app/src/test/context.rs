//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    database::Db,
    domain::{donations::PgDonationsService, orders::PgOrdersService},
    payments::MockPaymentProvider,
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub donations: PgDonationsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;

        Self {
            donations: PgDonationsService::new(Db::new(db.pool().clone())),
            db,
        }
    }

    /// Orders service on this database, talking to a scripted payment provider.
    pub fn orders(&self, payments: MockPaymentProvider) -> PgOrdersService {
        PgOrdersService::new(Db::new(self.db.pool().clone()), Arc::new(payments))
    }
}
