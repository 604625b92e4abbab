//! Persistent state stores.
//!
//! Each store is a plain state value with pure mutation methods, wrapped in
//! [`Persisted`] at construction time. `Persisted` rehydrates the state from
//! a [`StorageBackend`] under a store-specific key and writes it back after
//! every mutating operation.
//!
//! # Failure model
//!
//! Persistence is advisory. A backend that cannot be read yields the default
//! state, and a failed write is logged and dropped; the store keeps working
//! in memory either way. Nothing here returns a persistence error to callers.
//!
//! # Keys
//!
//! Keys are `{prefix}-{namespace}`, e.g. `fruittura-cart`. Blobs are stored
//! as a JSON envelope `{"state": ..., "version": N}`.

mod auth;
mod cart;
mod file;
mod memory;
mod wishlist;

use std::sync::Arc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use auth::{AuthState, AuthStore};
pub use cart::{CartState, CartStore, clamp_to_stock};
pub use file::FileStorage;
pub use memory::{MemoryStorage, UnavailableStorage};
pub use wishlist::{WishlistState, WishlistStore};

/// Default key prefix for persisted stores.
pub const DEFAULT_KEY_PREFIX: &str = "fruittura";

/// Errors raised by storage backends.
///
/// These stop at [`Persisted`]; stores never surface them.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend is not usable at all (disabled, quota, poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// State could not be encoded or decoded.
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Namespaced get/set of serialized state blobs.
pub trait StorageBackend: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Delete the blob stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// State that can be held by a [`Persisted`] store.
pub trait StoreState: Serialize + DeserializeOwned + Default {
    /// Store-specific namespace, appended to the key prefix.
    const NAMESPACE: &'static str;

    /// Schema version written into the envelope. Blobs with any other
    /// version are discarded on load.
    const VERSION: u32 = 0;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, S> {
    state: &'a S,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<S> {
    state: S,
    #[serde(default)]
    version: u32,
}

/// A state value that is loaded on construction and saved after mutation.
pub struct Persisted<S> {
    state: S,
    key: String,
    backend: Arc<dyn StorageBackend>,
}

impl<S: StoreState> Persisted<S> {
    /// Rehydrate state from `backend`, falling back to `S::default()`.
    pub fn load(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        let key = format!("{prefix}-{}", S::NAMESPACE);
        let state = match backend.load(&key) {
            Ok(Some(blob)) => decode::<S>(&key, &blob).unwrap_or_default(),
            Ok(None) => S::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to load persisted state, starting empty");
                S::default()
            }
        };

        Self {
            state,
            key,
            backend,
        }
    }

    /// A store backed by a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()), DEFAULT_KEY_PREFIX)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Storage key this store writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Apply a mutation, then write the new state to the backend.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut S) -> R) -> R {
        let result = mutate(&mut self.state);
        self.persist();
        result
    }

    fn persist(&self) {
        let envelope = EnvelopeRef {
            state: &self.state,
            version: S::VERSION,
        };
        let outcome = serde_json::to_string(&envelope)
            .map_err(StorageError::from)
            .and_then(|blob| self.backend.save(&self.key, &blob));

        if let Err(e) = outcome {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist state, continuing in memory");
        }
    }
}

fn decode<S: StoreState>(key: &str, blob: &str) -> Option<S> {
    match serde_json::from_str::<Envelope<S>>(blob) {
        Ok(envelope) if envelope.version == S::VERSION => Some(envelope.state),
        Ok(envelope) => {
            tracing::warn!(
                key = %key,
                found = envelope.version,
                expected = S::VERSION,
                "Discarding persisted state with unknown version"
            );
            None
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Discarding undecodable persisted state");
            None
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Persisted<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
