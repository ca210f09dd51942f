//! Payment Models

use fairway::metadata::Metadata;
use serde::Deserialize;

/// A priced line on a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    /// Product name shown to the customer.
    pub name: String,

    /// Absolute image URLs.
    pub images: Vec<String>,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Unit price in minor units.
    pub unit_amount: i64,

    pub quantity: u32,
}

/// Request to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckoutSession {
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: Metadata,
}

/// Payment state of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,

    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// A checkout session as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,

    /// Hosted page URL; only present while the session is open.
    #[serde(default)]
    pub url: Option<String>,

    pub payment_status: PaymentStatus,

    /// Provider transaction reference.
    #[serde(default)]
    pub payment_intent: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub customer_email: Option<String>,

    /// Amount charged, in minor units.
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl CheckoutSession {
    /// Whether the provider has collected payment.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Email the customer paid with, falling back to the one the session was opened with.
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.as_deref())
            .or(self.customer_email.as_deref())
            .filter(|email| !email.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn decodes_provider_session() -> TestResult {
        let session: CheckoutSession = serde_json::from_value(json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "url": null,
            "payment_status": "paid",
            "payment_intent": "pi_123",
            "customer_details": { "email": "ace@fairway.example", "name": "Ace" },
            "customer_email": null,
            "amount_total": 11800,
            "metadata": { "items_chunks": "1" }
        }))?;

        assert!(session.is_paid());
        assert_eq!(session.payment_intent.as_deref(), Some("pi_123"));
        assert_eq!(session.customer_email(), Some("ace@fairway.example"));
        assert_eq!(session.metadata.get("items_chunks").map(String::as_str), Some("1"));

        Ok(())
    }

    #[test]
    fn unknown_payment_status_is_not_paid() -> TestResult {
        let session: CheckoutSession = serde_json::from_value(json!({
            "id": "cs_test_123",
            "payment_status": "processing"
        }))?;

        assert_eq!(session.payment_status, PaymentStatus::Unknown);
        assert!(!session.is_paid());
        assert_eq!(session.customer_email(), None);

        Ok(())
    }
}
