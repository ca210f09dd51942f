//! Order Snapshot Metadata
//!
//! A paid order is rebuilt from the metadata attached to its payment session, so the snapshot of
//! items, address and authoritative prices has to survive a flat string map whose values are
//! length-limited. The item list is written as JSON split across numbered keys.

use std::{collections::BTreeMap, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    address::ShippingAddress,
    checkout::ValidatedCheckout,
    items::LineItem,
    pricing::{PriceBreakdown, reconcile, round2},
};

/// Flat string metadata as attached to a payment session.
pub type Metadata = BTreeMap<String, String>;

/// Maximum number of characters in one items chunk. Providers cap values at 500.
pub const ITEMS_CHUNK_SIZE: usize = 490;

/// Key holding the number of item chunks.
pub const ITEMS_CHUNKS_KEY: &str = "items_chunks";

/// Key holding an unchunked item list.
pub const ITEMS_KEY: &str = "items";

/// Key holding the shipping address JSON.
pub const SHIPPING_ADDRESS_KEY: &str = "shippingAddress";

const ITEMS_PRICE_KEY: &str = "itemsPrice";
const TAX_PRICE_KEY: &str = "taxPrice";
const SHIPPING_PRICE_KEY: &str = "shippingPrice";
const TOTAL_PRICE_KEY: &str = "totalPrice";

/// Errors encoding or decoding an [`OrderSnapshot`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be serialized.
    #[error("failed to encode order snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// A required key is absent.
    #[error("missing metadata key {0}")]
    MissingKey(String),

    /// `items_chunks` is not a count.
    #[error("invalid chunk count {0:?}")]
    InvalidChunkCount(String),

    /// The joined item JSON is not a valid item list.
    #[error("malformed items in metadata: {0}")]
    MalformedItems(#[source] serde_json::Error),

    /// The shipping address JSON is not a valid address.
    #[error("malformed shipping address in metadata: {0}")]
    MalformedAddress(#[source] serde_json::Error),

    /// A price value is not a decimal.
    #[error("invalid amount {value:?} for {key}")]
    InvalidAmount {
        /// Metadata key
        key: &'static str,

        /// Offending value
        value: String,
    },
}

/// Everything needed to create an order once payment completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    /// Purchased items.
    pub items: Vec<LineItem>,

    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Prices as charged.
    pub prices: PriceBreakdown,
}

impl From<&ValidatedCheckout> for OrderSnapshot {
    fn from(checkout: &ValidatedCheckout) -> Self {
        Self {
            items: checkout.items.clone(),
            shipping_address: checkout.shipping_address.clone(),
            prices: checkout.prices,
        }
    }
}

impl OrderSnapshot {
    /// Check that the stored prices are what the reconciler makes of the stored items.
    pub fn is_consistent(&self) -> bool {
        reconcile(&self.items) == self.prices
    }

    /// Encode into flat metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<Metadata, SnapshotError> {
        let items = serde_json::to_string(&self.items).map_err(SnapshotError::Encode)?;
        let address =
            serde_json::to_string(&self.shipping_address).map_err(SnapshotError::Encode)?;

        let mut metadata = Metadata::new();

        let chunks = chunk_chars(&items, ITEMS_CHUNK_SIZE);

        metadata.insert(ITEMS_CHUNKS_KEY.to_string(), chunks.len().to_string());

        for (i, chunk) in chunks.into_iter().enumerate() {
            metadata.insert(format!("items_{i}"), chunk);
        }

        metadata.insert(SHIPPING_ADDRESS_KEY.to_string(), address);

        for (key, amount) in [
            (ITEMS_PRICE_KEY, self.prices.items_price),
            (TAX_PRICE_KEY, self.prices.tax_price),
            (SHIPPING_PRICE_KEY, self.prices.shipping_price),
            (TOTAL_PRICE_KEY, self.prices.total_price),
        ] {
            metadata.insert(key.to_string(), round2(amount).to_string());
        }

        Ok(metadata)
    }

    /// Decode from flat metadata.
    ///
    /// Chunks are joined in order. A missing or zero `items_chunks` falls back to a single
    /// `items` key, or to no items at all.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] naming the first key that could not be decoded.
    pub fn decode(metadata: &Metadata) -> Result<Self, SnapshotError> {
        let items = join_items(metadata)?;
        let items: Vec<LineItem> =
            serde_json::from_str(&items).map_err(SnapshotError::MalformedItems)?;

        let address = required(metadata, SHIPPING_ADDRESS_KEY)?;
        let shipping_address: ShippingAddress =
            serde_json::from_str(address).map_err(SnapshotError::MalformedAddress)?;

        let prices = PriceBreakdown {
            items_price: amount(metadata, ITEMS_PRICE_KEY)?,
            tax_price: amount(metadata, TAX_PRICE_KEY)?,
            shipping_price: amount(metadata, SHIPPING_PRICE_KEY)?,
            total_price: amount(metadata, TOTAL_PRICE_KEY)?,
        };

        Ok(Self {
            items,
            shipping_address,
            prices,
        })
    }
}

fn chunk_chars(value: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();

    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn join_items(metadata: &Metadata) -> Result<String, SnapshotError> {
    let count = match metadata.get(ITEMS_CHUNKS_KEY) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_invalid| SnapshotError::InvalidChunkCount(raw.clone()))?,
        None => 0,
    };

    if count == 0 {
        return Ok(metadata
            .get(ITEMS_KEY)
            .cloned()
            .unwrap_or_else(|| "[]".to_string()));
    }

    (0..count)
        .map(|i| {
            let key = format!("items_{i}");

            metadata
                .get(&key)
                .map(String::as_str)
                .ok_or(SnapshotError::MissingKey(key))
        })
        .collect()
}

fn required<'a>(metadata: &'a Metadata, key: &str) -> Result<&'a str, SnapshotError> {
    metadata
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| SnapshotError::MissingKey(key.to_string()))
}

fn amount(metadata: &Metadata, key: &'static str) -> Result<Decimal, SnapshotError> {
    let value = required(metadata, key)?;

    Decimal::from_str(value.trim())
        .map(round2)
        .map_err(|_invalid| SnapshotError::InvalidAmount {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{address::tests::address, items::tests::disc};

    use super::*;

    fn snapshot(items: Vec<LineItem>) -> OrderSnapshot {
        let prices = reconcile(&items);

        OrderSnapshot {
            items,
            shipping_address: address(),
            prices,
        }
    }

    #[test]
    fn encode_writes_prices_as_plain_decimals() -> TestResult {
        let metadata = snapshot(vec![disc("a", 100_00, 1, 5)]).encode()?;

        assert_eq!(metadata.get("itemsPrice").map(String::as_str), Some("100.00"));
        assert_eq!(metadata.get("taxPrice").map(String::as_str), Some("8.00"));
        assert_eq!(metadata.get("shippingPrice").map(String::as_str), Some("10.00"));
        assert_eq!(metadata.get("totalPrice").map(String::as_str), Some("118.00"));
        assert_eq!(metadata.get("items_chunks").map(String::as_str), Some("1"));

        Ok(())
    }

    #[test]
    fn every_value_fits_provider_limit() -> TestResult {
        let items = (0..40).map(|i| disc(&format!("disc-{i}"), 19_99, 1, 5)).collect();

        let metadata = snapshot(items).encode()?;

        assert!(metadata.len() > 5, "items should span several chunks");
        assert!(
            metadata
                .iter()
                .filter(|(key, _)| key.starts_with("items_") && *key != ITEMS_CHUNKS_KEY)
                .all(|(_, value)| value.chars().count() <= ITEMS_CHUNK_SIZE),
            "chunks must not exceed {ITEMS_CHUNK_SIZE} characters"
        );

        Ok(())
    }

    #[test]
    fn chunked_round_trip_with_multibyte_names() -> TestResult {
        let items: Vec<_> = (0..25)
            .map(|i| {
                let mut item = disc(&format!("disc-{i}"), 24_50, 2, 4);
                item.name = format!("Zúñiga Ünicorn 飛ぶ 🥏 #{i}");
                item
            })
            .collect();

        let original = snapshot(items);
        let metadata = original.encode()?;

        let chunks: usize = metadata
            .get(ITEMS_CHUNKS_KEY)
            .map(|count| count.parse())
            .transpose()?
            .unwrap_or_default();

        assert!(chunks > 1, "expected several chunks, got {chunks}");

        let decoded = OrderSnapshot::decode(&metadata)?;

        assert_eq!(decoded, original);
        assert!(decoded.is_consistent());

        Ok(())
    }

    #[test]
    fn decode_falls_back_to_single_items_key() -> TestResult {
        let original = snapshot(vec![disc("a", 10_00, 1, 5)]);

        let mut metadata = original.encode()?;
        let items = metadata.remove("items_0").unwrap_or_default();

        metadata.remove(ITEMS_CHUNKS_KEY);
        metadata.insert(ITEMS_KEY.to_string(), items);

        assert_eq!(OrderSnapshot::decode(&metadata)?, original);

        Ok(())
    }

    #[test]
    fn decode_without_items_gives_empty_list() -> TestResult {
        let mut metadata = snapshot(vec![disc("a", 10_00, 1, 5)]).encode()?;

        metadata.insert(ITEMS_CHUNKS_KEY.to_string(), "0".to_string());

        let decoded = OrderSnapshot::decode(&metadata)?;

        assert!(decoded.items.is_empty());
        assert!(!decoded.is_consistent());

        Ok(())
    }

    #[test]
    fn decode_rejects_missing_chunk() -> TestResult {
        let mut metadata = snapshot(vec![disc("a", 10_00, 1, 5)]).encode()?;

        metadata.insert(ITEMS_CHUNKS_KEY.to_string(), "2".to_string());

        assert!(matches!(
            OrderSnapshot::decode(&metadata),
            Err(SnapshotError::MissingKey(key)) if key == "items_1"
        ));

        Ok(())
    }

    #[test]
    fn decode_rejects_bad_amounts_and_counts() -> TestResult {
        let mut metadata = snapshot(vec![disc("a", 10_00, 1, 5)]).encode()?;

        metadata.insert("taxPrice".to_string(), "eight".to_string());

        assert!(matches!(
            OrderSnapshot::decode(&metadata),
            Err(SnapshotError::InvalidAmount { key: "taxPrice", .. })
        ));

        metadata.insert(ITEMS_CHUNKS_KEY.to_string(), "-1".to_string());

        assert!(matches!(
            OrderSnapshot::decode(&metadata),
            Err(SnapshotError::InvalidChunkCount(_))
        ));

        Ok(())
    }

    #[test]
    fn decode_requires_shipping_address() -> TestResult {
        let mut metadata = snapshot(vec![disc("a", 10_00, 1, 5)]).encode()?;

        metadata.remove(SHIPPING_ADDRESS_KEY);

        assert!(matches!(
            OrderSnapshot::decode(&metadata),
            Err(SnapshotError::MissingKey(key)) if key == SHIPPING_ADDRESS_KEY
        ));

        Ok(())
    }
}
