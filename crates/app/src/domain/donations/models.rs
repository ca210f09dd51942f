//! Donation Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use fairway::{
    ValidationError,
    validation::{require_email, require_non_blank},
};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Donation UUID
pub type DonationUuid = TypedUuid<Donation>;

/// Condition of a donated disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl DiscCondition {
    pub const ALL: [Self; 5] = [Self::New, Self::LikeNew, Self::Good, Self::Fair, Self::Poor];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl Display for DiscCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscCondition {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == value.trim())
            .ok_or_else(|| {
                ValidationError::new(
                    "condition",
                    "must be one of new, like-new, good, fair, poor",
                )
            })
    }
}

/// Where a donation is in intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DonationStatus {
    #[default]
    Pending,
    Received,
    Processed,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Received => "received",
            Self::Processed => "processed",
        }
    }
}

impl FromStr for DonationStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "received" => Ok(Self::Received),
            "processed" => Ok(Self::Processed),
            _ => Err(ValidationError::new(
                "status",
                "must be one of pending, received, processed",
            )),
        }
    }
}

/// Donation Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub uuid: DonationUuid,
    pub donor_name: String,
    pub email: String,
    pub phone: String,
    pub disc_brand: String,
    pub disc_model: String,
    pub condition: DiscCondition,
    pub description: Option<String>,
    pub status: DonationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Donation Model, as submitted by a donor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub uuid: DonationUuid,
    pub donor_name: String,
    pub email: String,
    pub phone: String,
    pub disc_brand: String,
    pub disc_model: String,
    pub condition: String,
    pub description: Option<String>,
}

impl NewDonation {
    /// Check the submission, returning the parsed disc condition.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<DiscCondition, ValidationError> {
        require_non_blank("donorName", &self.donor_name)?;
        require_email("email", &self.email)?;
        require_non_blank("phone", &self.phone)?;
        require_non_blank("discBrand", &self.disc_brand)?;
        require_non_blank("discModel", &self.disc_model)?;

        self.condition.parse()
    }

    /// The description, with blank text treated as absent.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn donation() -> NewDonation {
        NewDonation {
            uuid: DonationUuid::new(),
            donor_name: "Ricky Wysocki".to_string(),
            email: "ricky@fairway.example".to_string(),
            phone: "555-0199".to_string(),
            disc_brand: "Innova".to_string(),
            disc_model: "Destroyer".to_string(),
            condition: "like-new".to_string(),
            description: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_donation_parses_condition() -> TestResult {
        assert_eq!(donation().validate()?, DiscCondition::LikeNew);
        assert_eq!(donation().description(), None);

        Ok(())
    }

    #[test]
    fn conditions_round_trip_through_strings() -> TestResult {
        for condition in DiscCondition::ALL {
            assert_eq!(condition.as_str().parse::<DiscCondition>()?, condition);
        }

        Ok(())
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let donation = NewDonation {
            condition: "mint".to_string(),
            ..donation()
        };

        let error = donation.validate().err();

        assert_eq!(error.as_ref().map(ValidationError::field), Some("condition"));
    }

    #[test]
    fn email_is_checked_before_disc_fields() {
        let donation = NewDonation {
            email: "nope".to_string(),
            disc_brand: String::new(),
            ..donation()
        };

        let error = donation.validate().err();

        assert_eq!(error.as_ref().map(ValidationError::field), Some("email"));
    }

    #[test]
    fn status_defaults_to_pending() -> TestResult {
        assert_eq!(DonationStatus::default(), DonationStatus::Pending);
        assert_eq!("processed".parse::<DonationStatus>()?, DonationStatus::Processed);

        Ok(())
    }
}
