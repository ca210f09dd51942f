//! Submit Donation Handler

use std::sync::Arc;

use fairway_app::domain::donations::models::{DonationUuid, NewDonation};
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{donations::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Donation Form
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DonationRequest {
    pub donor_name: String,
    pub email: String,
    pub phone: String,
    pub disc_brand: String,
    pub disc_model: String,
    pub condition: String,
    pub description: Option<String>,
}

impl From<DonationRequest> for NewDonation {
    fn from(request: DonationRequest) -> Self {
        NewDonation {
            uuid: DonationUuid::new(),
            donor_name: request.donor_name,
            email: request.email,
            phone: request.phone,
            disc_brand: request.disc_brand,
            disc_model: request.disc_model,
            condition: request.condition,
            description: request.description,
        }
    }
}

/// Donation Received Response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DonationReceivedResponse {
    pub success: bool,
    pub donation_id: Uuid,
}

/// Submit Donation Handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DonationReceivedResponse>, ApiError> {
    let request: DonationRequest = req.parse_json().await?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let donation = state
        .app
        .donations
        .submit(request.into())
        .await
        .map_err(into_api_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(DonationReceivedResponse {
        success: true,
        donation_id: donation.uuid.into_uuid(),
    }))
}

#[cfg(test)]
mod tests {
    use fairway::ValidationError;
    use fairway_app::domain::donations::{
        DonationsServiceError, MockDonationsService,
        models::{DiscCondition, Donation, DonationStatus},
    };
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, make_service},
    };

    use super::*;

    fn make_donations_service(donations: MockDonationsService) -> Service {
        make_service(
            Mocks::with_donations(donations),
            Router::with_path("donations").post(handler),
        )
    }

    fn form() -> Value {
        json!({
            "donorName": "Kristin Tattar",
            "email": "kristin@fairway.example",
            "phone": "555-0177",
            "discBrand": "Discraft",
            "discModel": "Buzzz",
            "condition": "like-new",
        })
    }

    fn stored(donation: &NewDonation) -> Donation {
        let now = Timestamp::now();

        Donation {
            uuid: donation.uuid,
            donor_name: donation.donor_name.clone(),
            email: donation.email.clone(),
            phone: donation.phone.clone(),
            disc_brand: donation.disc_brand.clone(),
            disc_model: donation.disc_model.clone(),
            condition: DiscCondition::LikeNew,
            description: None,
            status: DonationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_submit_donation_returns_201() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_submit()
            .once()
            .withf(|donation| donation.disc_model == "Buzzz" && donation.condition == "like-new")
            .returning(|donation| Ok(stored(&donation)));

        let mut res = TestClient::post("http://example.com/donations")
            .json(&form())
            .send(&make_donations_service(donations))
            .await;

        let body: DonationReceivedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert!(body.success, "expected success flag");
        assert!(!body.donation_id.is_nil(), "expected a donation id");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_condition_returns_400() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_submit().once().return_once(|_| {
            Err(DonationsServiceError::Validation(ValidationError::new(
                "condition",
                "must be one of new, like-new, good, fair, poor",
            )))
        });

        let mut res = TestClient::post("http://example.com/donations")
            .json(&form())
            .send(&make_donations_service(donations))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(body.error.starts_with("condition: "), "{}", body.error);

        Ok(())
    }
}
