//! Checkout Models

use fairway::{
    money::{MoneyConversionError, parse_currency},
    pricing::PriceBreakdown,
};

/// Where hosted checkout sends the customer and what currency it charges in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Public origin of the storefront, e.g. `https://fairway.example`.
    pub public_origin: String,

    /// Lowercase ISO currency code.
    pub currency: String,
}

impl CheckoutSettings {
    /// Settings charging in `currency_code`, which must be a currency the store supports.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyConversionError::UnknownCurrency`] for an unsupported code.
    pub fn new(
        public_origin: impl Into<String>,
        currency_code: &str,
    ) -> Result<Self, MoneyConversionError> {
        let currency = parse_currency(currency_code)?;

        Ok(Self {
            public_origin: public_origin.into(),
            currency: currency.iso_alpha_code.to_ascii_lowercase(),
        })
    }

    /// Page the provider redirects to after payment. The provider fills in the session id.
    pub fn success_url(&self) -> String {
        format!(
            "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.origin()
        )
    }

    /// Page the provider redirects to when the customer backs out.
    pub fn cancel_url(&self) -> String {
        format!("{}/checkout", self.origin())
    }

    /// Resolve a storefront-relative image reference into an absolute URL.
    pub fn absolute_image(&self, image: &str) -> Option<String> {
        let image = image.trim();

        if image.is_empty() {
            return None;
        }

        if image.starts_with("http://") || image.starts_with("https://") {
            return Some(image.to_string());
        }

        Some(format!("{}/{}", self.origin(), image.trim_start_matches('/')))
    }

    fn origin(&self) -> &str {
        self.public_origin.trim_end_matches('/')
    }
}

/// A hosted checkout session ready for the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCheckout {
    pub session_id: String,
    pub url: String,
    pub prices: PriceBreakdown,
}
