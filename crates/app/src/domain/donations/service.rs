//! Donations service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::donations::{
        errors::DonationsServiceError,
        models::{Donation, DonationUuid, NewDonation},
        repository::PgDonationsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgDonationsService {
    db: Db,
    repository: PgDonationsRepository,
}

impl PgDonationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDonationsRepository::new(),
        }
    }
}

#[async_trait]
impl DonationsService for PgDonationsService {
    async fn submit(&self, donation: NewDonation) -> Result<Donation, DonationsServiceError> {
        let condition = donation.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_donation(&mut tx, &donation, condition)
            .await?;

        tx.commit().await?;

        info!(donation_uuid = %created.uuid, condition = %created.condition, "received donation");

        Ok(created)
    }

    async fn get_donation(&self, donation: DonationUuid) -> Result<Donation, DonationsServiceError> {
        let mut tx = self.db.begin().await?;

        let donation = self.repository.get_donation(&mut tx, donation).await?;

        tx.commit().await?;

        Ok(donation)
    }
}

#[automock]
#[async_trait]
pub trait DonationsService: Send + Sync {
    /// Validate and record a donation as pending.
    async fn submit(&self, donation: NewDonation) -> Result<Donation, DonationsServiceError>;

    /// Retrieve a single donation.
    async fn get_donation(&self, donation: DonationUuid) -> Result<Donation, DonationsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::donations::models::{DiscCondition, DonationStatus},
        test::TestContext,
    };

    use super::*;

    fn donation(uuid: DonationUuid) -> NewDonation {
        NewDonation {
            uuid,
            donor_name: " Ricky Wysocki ".to_string(),
            email: "ricky@fairway.example".to_string(),
            phone: "555-0199".to_string(),
            disc_brand: "Innova".to_string(),
            disc_model: "Destroyer".to_string(),
            condition: "good".to_string(),
            description: Some("Some ink on the rim".to_string()),
        }
    }

    #[tokio::test]
    async fn submit_records_pending_donation() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = DonationUuid::new();

        let created = ctx.donations.submit(donation(uuid)).await?;

        assert_eq!(created.uuid, uuid);
        assert_eq!(created.donor_name, "Ricky Wysocki");
        assert_eq!(created.condition, DiscCondition::Good);
        assert_eq!(created.status, DonationStatus::Pending);
        assert_eq!(created.description.as_deref(), Some("Some ink on the rim"));

        let fetched = ctx.donations.get_donation(uuid).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_donations_are_not_stored() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = DonationUuid::new();

        let result = ctx
            .donations
            .submit(NewDonation {
                condition: "mint".to_string(),
                ..donation(uuid)
            })
            .await;

        assert!(
            matches!(result, Err(DonationsServiceError::Validation(ref error)) if error.field() == "condition"),
            "expected validation error, got {result:?}"
        );

        let lookup = ctx.donations.get_donation(uuid).await;

        assert!(
            matches!(lookup, Err(DonationsServiceError::NotFound)),
            "expected NotFound, got {lookup:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_uuid_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = DonationUuid::new();

        ctx.donations.submit(donation(uuid)).await?;

        let result = ctx.donations.submit(donation(uuid)).await;

        assert!(
            matches!(result, Err(DonationsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
