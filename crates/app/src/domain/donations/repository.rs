//! Donations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::donations::models::{
    DiscCondition, Donation, DonationStatus, DonationUuid, NewDonation,
};

const CREATE_DONATION_SQL: &str = include_str!("sql/create_donation.sql");
const GET_DONATION_SQL: &str = include_str!("sql/get_donation.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDonationsRepository;

impl PgDonationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_donation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        donation: &NewDonation,
        condition: DiscCondition,
    ) -> Result<Donation, sqlx::Error> {
        query_as::<Postgres, Donation>(CREATE_DONATION_SQL)
            .bind(donation.uuid.into_uuid())
            .bind(donation.donor_name.trim())
            .bind(donation.email.trim())
            .bind(donation.phone.trim())
            .bind(donation.disc_brand.trim())
            .bind(donation.disc_model.trim())
            .bind(condition.as_str())
            .bind(donation.description())
            .bind(DonationStatus::default().as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_donation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        donation: DonationUuid,
    ) -> Result<Donation, sqlx::Error> {
        query_as::<Postgres, Donation>(GET_DONATION_SQL)
            .bind(donation.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Donation {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let condition = row
            .try_get::<String, _>("condition")?
            .parse::<DiscCondition>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "condition".to_string(),
                source: Box::new(e),
            })?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<DonationStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: DonationUuid::from_uuid(row.try_get("uuid")?),
            donor_name: row.try_get("donor_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            disc_brand: row.try_get("disc_brand")?,
            disc_model: row.try_get("disc_model")?,
            condition,
            description: row.try_get("description")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
