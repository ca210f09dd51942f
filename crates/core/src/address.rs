//! Shipping Addresses

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_non_blank};

/// Where an order ships to. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    /// Recipient name
    pub full_name: String,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// Province or state
    pub province: String,

    /// Contact phone number
    pub phone: String,

    /// Country
    pub country: String,
}

impl ShippingAddress {
    /// Check every field is present.
    ///
    /// # Errors
    ///
    /// Returns the first missing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        [
            ("fullName", &self.full_name),
            ("street", &self.street),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("province", &self.province),
            ("phone", &self.phone),
            ("country", &self.country),
        ]
        .into_iter()
        .try_for_each(|(field, value)| require_non_blank(field, value))
    }
}
