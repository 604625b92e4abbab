//! Wishlist store. Unique by product ID; adding twice is the same as once.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use fruittura_core::ProductId;

use super::{Persisted, StorageBackend, StoreState};
use crate::models::{Product, WishlistItem};

/// Serializable wishlist contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WishlistState {
    pub items: Vec<WishlistItem>,
}

impl StoreState for WishlistState {
    const NAMESPACE: &'static str = "wishlist";
}

impl WishlistState {
    fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product.id == product_id)
    }
}

/// Saved products with durable persistence.
#[derive(Debug)]
pub struct WishlistStore {
    inner: Persisted<WishlistState>,
}

impl WishlistStore {
    /// Load the wishlist from `backend` under `{prefix}-wishlist`.
    pub fn load(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        Self {
            inner: Persisted::load(backend, prefix),
        }
    }

    /// An empty wishlist that is never written anywhere durable.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Persisted::in_memory(),
        }
    }

    /// Saved items, oldest first.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.inner.state().items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Save a product, stamped with the current time. Returns `false` if it
    /// was already saved (nothing changes).
    pub fn add_item(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            return false;
        }
        self.inner.update(|state| {
            state.items.push(WishlistItem {
                product: product.clone(),
                added_at: Utc::now(),
            });
        });
        tracing::debug!(product_id = %product.id, "Added to wishlist");
        true
    }

    /// Drop a product. No-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.inner
            .update(|state| state.items.retain(|item| &item.product.id != product_id));
        tracing::debug!(product_id = %product_id, "Removed from wishlist");
    }

    /// Membership test.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.inner.state().contains(product_id)
    }

    /// Heart-button behaviour: add if absent, remove if present. Returns
    /// whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            self.remove_item(&product.id);
            false
        } else {
            self.add_item(product)
        }
    }

    /// Remove every item.
    pub fn clear_wishlist(&mut self) {
        self.inner.update(|state| state.items.clear());
    }
}
