//! Cart Storage
//!
//! Durable, client-resident storage for a [`Cart`]. The full aggregate is written through to a
//! [`CartStore`] after every mutation and restored when the cart is opened again.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{cart::Cart, items::LineItem, validation::ValidationError};

/// Namespace the cart is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Version tag written alongside the stored state.
pub const CART_STATE_VERSION: u32 = 0;

/// Errors reading or writing stored cart state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying storage failed.
    #[error("cart storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The cart could not be serialized.
    #[error("failed to serialize cart state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why stored state could not be turned back into a cart.
#[derive(Debug, Error)]
pub enum StateRestoreError {
    /// The stored record was unreadable.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored record was not valid cart JSON.
    #[error("stored cart state is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The stored record was written by an incompatible version.
    #[error("unsupported stored cart version {0}")]
    UnsupportedVersion(u32),

    /// The stored items violate line item rules.
    #[error("stored cart items are invalid: {0}")]
    Invalid(#[source] ValidationError),
}

/// Errors from mutating a [`PersistentCart`].
#[derive(Debug, Error)]
pub enum CartError {
    /// The item was rejected; nothing changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The mutation was applied in memory but could not be written through.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A key/value store holding serialized cart state.
pub trait CartStore {
    /// Read the record under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the record under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record under `key`. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    records: HashMap<String, String>,
}

impl MemoryCartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one record.
    pub fn with_record(key: &str, value: impl Into<String>) -> Self {
        let mut records = HashMap::new();

        records.insert(key.to_string(), value.into());

        Self { records }
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.records.remove(key);

        Ok(())
    }
}

/// Store keeping one JSON file per key inside a directory.
///
/// Writes go to a sibling temporary file which is then renamed over the record, so a crash
/// mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    dir: PathBuf,
}

impl FileCartStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory records are kept in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStore for FileCartStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[derive(Serialize)]
struct StoredEnvelope<'a> {
    state: &'a Cart,
    version: u32,
}

#[derive(Deserialize)]
struct RestoredEnvelope {
    state: RestoredState,

    #[serde(default)]
    version: u32,
}

/// Only the items are trusted on restore; stored prices are ignored and recomputed.
#[derive(Deserialize)]
struct RestoredState {
    #[serde(default)]
    items: Vec<LineItem>,
}

/// Serialize a cart into its stored form.
///
/// # Errors
///
/// Returns a [`StorageError`] if serialization fails.
pub fn encode_state(cart: &Cart) -> Result<String, StorageError> {
    let envelope = StoredEnvelope {
        state: cart,
        version: CART_STATE_VERSION,
    };

    Ok(serde_json::to_string(&envelope)?)
}

/// Rebuild a cart from its stored form.
///
/// Items are replayed through [`Cart::add_item`] so the restored cart satisfies every cart
/// invariant, whatever was on disk.
///
/// # Errors
///
/// Returns a [`StateRestoreError`] describing why the record was rejected.
pub fn decode_state(value: &str) -> Result<Cart, StateRestoreError> {
    let envelope: RestoredEnvelope =
        serde_json::from_str(value).map_err(StateRestoreError::Malformed)?;

    if envelope.version != CART_STATE_VERSION {
        return Err(StateRestoreError::UnsupportedVersion(envelope.version));
    }

    Cart::with_items(envelope.state.items).map_err(StateRestoreError::Invalid)
}

/// A cart bound to a store, written through on every mutation.
#[derive(Debug)]
pub struct PersistentCart<S> {
    cart: Cart,
    store: S,
    key: String,
}

impl<S: CartStore> PersistentCart<S> {
    /// Open the cart stored under [`CART_STORAGE_KEY`].
    pub fn open(store: S) -> Self {
        Self::open_with_key(store, CART_STORAGE_KEY)
    }

    /// Open the cart stored under `key`.
    ///
    /// Missing state yields an empty cart. Unreadable or corrupt state also yields an empty
    /// cart and is logged; it never fails the caller.
    pub fn open_with_key(store: S, key: &str) -> Self {
        let cart = match restore(&store, key) {
            Ok(Some(cart)) => {
                debug!(key, items = cart.len(), "restored cart");

                cart
            }
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(key, %error, "discarding unrestorable cart state");

                Cart::new()
            }
        };

        Self {
            cart,
            store,
            key: key.to_string(),
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the wrapper, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// See [`Cart::add_item`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] if the item is rejected, or [`CartError::Storage`] if
    /// the new state could not be written.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        self.cart.add_item(item)?;

        Ok(self.persist()?)
    }

    /// See [`Cart::remove_item`].
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the new state could not be written.
    pub fn remove_item(&mut self, client_id: &str) -> Result<(), StorageError> {
        self.cart.remove_item(client_id);

        self.persist()
    }

    /// See [`Cart::update_quantity`].
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the new state could not be written.
    pub fn update_quantity(&mut self, client_id: &str, quantity: u32) -> Result<(), StorageError> {
        self.cart.update_quantity(client_id, quantity);

        self.persist()
    }

    /// See [`Cart::clear`].
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the new state could not be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();

        self.persist()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let state = encode_state(&self.cart)?;

        self.store.save(&self.key, &state)
    }
}

fn restore<S: CartStore>(store: &S, key: &str) -> Result<Option<Cart>, StateRestoreError> {
    store
        .load(key)?
        .map(|value| decode_state(&value))
        .transpose()
}
