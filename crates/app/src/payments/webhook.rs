//! Webhook signature verification.
//!
//! Events carry a `t=<unix seconds>,v1=<hex hmac>` header. The signed payload is the timestamp,
//! a `.`, and the raw request body, keyed with the endpoint secret using HMAC-SHA256. Any one
//! matching `v1` entry accepts the event.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;

use crate::payments::models::CheckoutSession;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the event signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default maximum age of a signed event.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

/// Event type emitted once a hosted checkout completes.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Reasons an incoming event is rejected.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("signature header is malformed")]
    MalformedHeader,

    #[error("no signature matches the payload")]
    SignatureMismatch,

    #[error("signature timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,

    #[error("webhook secret cannot be used as a key")]
    InvalidSecret,

    #[error("malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Verifies event signatures with the endpoint secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_seconds: i64,
}

impl Debug for WebhookVerifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}

impl WebhookVerifier {
    #[must_use]
    pub fn new(secret: impl Into<String>, tolerance_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds: i64::try_from(tolerance_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Verify `payload` against `header` at the current time.
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`] if the header is malformed, stale, or matches no signature.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), WebhookError> {
        self.verify_at(payload, header, Timestamp::now())
    }

    /// Verify `payload` against `header` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`] if the header is malformed, stale, or matches no signature.
    pub fn verify_at(
        &self,
        payload: &[u8],
        header: &str,
        now: Timestamp,
    ) -> Result<(), WebhookError> {
        let (timestamp, signatures) = parse_header(header)?;

        if timestamp < now.as_second().saturating_sub(self.tolerance_seconds) {
            return Err(WebhookError::TimestampOutsideTolerance);
        }

        let mac = self.mac(timestamp, payload)?;

        let matched = signatures
            .iter()
            .filter_map(|signature| hex::decode(signature).ok())
            .any(|expected| mac.clone().verify_slice(&expected).is_ok());

        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        Ok(())
    }

    /// Verify and decode an event.
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`] if verification fails or the body is not an event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        header: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify(payload, header)?;

        Ok(serde_json::from_slice(payload)?)
    }

    /// Produce a signature header for `payload` at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidSecret`] if the secret cannot key the MAC.
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String, WebhookError> {
        let signature = hex::encode(self.mac(timestamp, payload)?.finalize().into_bytes());

        Ok(format!("t={timestamp},v1={signature}"))
    }

    fn mac(&self, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_invalid| WebhookError::InvalidSecret)?;

        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        Ok(mac)
    }
}

fn parse_header(header: &str) -> Result<(i64, Vec<&str>), WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };

        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_invalid| WebhookError::MalformedHeader)?,
                );
            }
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok((timestamp, signatures)),
        _ => Err(WebhookError::MalformedHeader),
    }
}

/// A verified provider event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub data: EventData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventData {
    pub object: Value,
}

impl WebhookEvent {
    /// The completed checkout session carried by this event, if it is a completion event.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MalformedPayload`] if the event object is not a session.
    pub fn completed_session(&self) -> Result<Option<CheckoutSession>, WebhookError> {
        if self.event_type != CHECKOUT_SESSION_COMPLETED {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(self.data.object.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn now() -> TestResult<Timestamp> {
        Ok(Timestamp::from_second(1_767_225_600)?)
    }

    fn payload() -> Vec<u8> {
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_1", "payment_status": "paid" } }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn accepts_valid_signature() -> TestResult {
        let verifier = WebhookVerifier::new(SECRET, DEFAULT_TOLERANCE_SECONDS);
        let now = now()?;

        let header = verifier.sign(&payload(), now.as_second())?;

        verifier.verify_at(&payload(), &header, now)?;

        Ok(())
    }

    #[test]
    fn accepts_any_matching_v1_entry() -> TestResult {
        let verifier = WebhookVerifier::new(SECRET, DEFAULT_TOLERANCE_SECONDS);
        let now = now()?;

        let signed = verifier.sign(&payload(), now.as_second())?;
        let signature = signed.split_once(",v1=").map(|(_, v1)| v1).unwrap_or_default();

        let header = format!("t={},v1={},v0=ignored,v1={signature}", now.as_second(), "00".repeat(32));

        verifier.verify_at(&payload(), &header, now)?;

        Ok(())
    }

    #[test]
    fn rejects_tampered_payload() -> TestResult {
        let verifier = WebhookVerifier::new(SECRET, DEFAULT_TOLERANCE_SECONDS);
        let now = now()?;

        let header = verifier.sign(&payload(), now.as_second())?;

        let result = verifier.verify_at(b"{\"id\":\"evt_2\"}", &header, now);

        assert!(matches!(result, Err(WebhookError::SignatureMismatch)));

        Ok(())
    }

    #[test]
    fn rejects_wrong_secret() -> TestResult {
        let now = now()?;
        let header = WebhookVerifier::new("whsec_other", 300).sign(&payload(), now.as_second())?;

        let result = WebhookVerifier::new(SECRET, 300).verify_at(&payload(), &header, now);

        assert!(matches!(result, Err(WebhookError::SignatureMismatch)));

        Ok(())
    }

    #[test]
    fn rejects_stale_timestamp() -> TestResult {
        let verifier = WebhookVerifier::new(SECRET, 300);
        let now = now()?;

        let header = verifier.sign(&payload(), now.as_second() - 301)?;

        let result = verifier.verify_at(&payload(), &header, now);

        assert!(matches!(result, Err(WebhookError::TimestampOutsideTolerance)));

        Ok(())
    }

    #[test]
    fn rejects_malformed_headers() -> TestResult {
        let verifier = WebhookVerifier::new(SECRET, 300);
        let now = now()?;

        for header in ["", "t=abc,v1=00", "v1=00", "t=1767225600", "garbage"] {
            let result = verifier.verify_at(&payload(), header, now);

            assert!(
                matches!(result, Err(WebhookError::MalformedHeader)),
                "{header:?} should be malformed"
            );
        }

        Ok(())
    }

    #[test]
    fn completed_session_is_extracted() -> TestResult {
        let event: WebhookEvent = serde_json::from_slice(&payload())?;

        let session = event.completed_session()?;

        assert_eq!(session.map(|session| session.id), Some("cs_1".to_string()));

        Ok(())
    }

    #[test]
    fn other_events_carry_no_session() -> TestResult {
        let event: WebhookEvent = serde_json::from_value(json!({
            "id": "evt_2",
            "type": "payment_intent.created",
            "data": { "object": { "id": "pi_1" } }
        }))?;

        assert_eq!(event.completed_session()?, None);

        Ok(())
    }

    #[test]
    fn debug_redacts_secret() {
        let verifier = WebhookVerifier::new(SECRET, 300);

        assert!(!format!("{verifier:?}").contains(SECRET));
    }
}
