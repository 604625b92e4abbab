//! Cart store.
//!
//! Lines are keyed by `(product.id, variant.id)`. Adding an existing key
//! merges quantities; removing or updating a missing key is a no-op. The
//! store does not clamp quantities to stock: that bound is enforced by the
//! caller (see [`CartStore::can_increment`] and [`clamp_to_stock`]).

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fruittura_core::{ProductId, VariantId};

use super::{Persisted, StorageBackend, StoreState};
use crate::models::{CartItem, Product, ProductVariant};

/// Serializable cart contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl StoreState for CartState {
    const NAMESPACE: &'static str = "cart";
}

impl CartState {
    fn position(&self, product_id: &ProductId, variant_id: &VariantId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.matches(product_id, variant_id))
    }

    fn add_item(&mut self, product: &Product, variant: &ProductVariant, quantity: u32) {
        match self.position(&product.id, &variant.id) {
            Some(index) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = item.quantity.saturating_add(quantity);
                }
            }
            None => self.items.push(CartItem {
                product: product.clone(),
                variant: variant.clone(),
                quantity,
            }),
        }
    }

    fn remove_item(&mut self, product_id: &ProductId, variant_id: &VariantId) {
        self.items
            .retain(|item| !item.matches(product_id, variant_id));
    }

    fn update_quantity(&mut self, product_id: &ProductId, variant_id: &VariantId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id, variant_id);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, variant_id))
        {
            item.quantity = quantity;
        }
    }

    /// Σ(variant.price × quantity), saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Σ quantity (units, not lines).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }
}

/// Cart line items with durable persistence.
#[derive(Debug)]
pub struct CartStore {
    inner: Persisted<CartState>,
}

impl CartStore {
    /// Load the cart from `backend` under `{prefix}-cart`.
    pub fn load(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        Self {
            inner: Persisted::load(backend, prefix),
        }
    }

    /// An empty cart that is never written anywhere durable.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Persisted::in_memory(),
        }
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.inner.state().items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items().len()
    }

    /// Find the line for a product variant.
    #[must_use]
    pub fn find(&self, product_id: &ProductId, variant_id: &VariantId) -> Option<&CartItem> {
        self.items()
            .iter()
            .find(|item| item.matches(product_id, variant_id))
    }

    /// Add `quantity` units of a variant, merging into an existing line.
    ///
    /// A zero quantity changes nothing.
    pub fn add_item(&mut self, product: &Product, variant: &ProductVariant, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.inner
            .update(|state| state.add_item(product, variant, quantity));
        tracing::debug!(
            product_id = %product.id,
            variant_id = %variant.id,
            quantity,
            "Added to cart"
        );
    }

    /// Delete a line. No-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId, variant_id: &VariantId) {
        self.inner
            .update(|state| state.remove_item(product_id, variant_id));
        tracing::debug!(product_id = %product_id, variant_id = %variant_id, "Removed from cart");
    }

    /// Replace the quantity on a line. Zero removes the line; a missing line
    /// is left missing.
    pub fn update_quantity(&mut self, product_id: &ProductId, variant_id: &VariantId, quantity: u32) {
        self.inner
            .update(|state| state.update_quantity(product_id, variant_id, quantity));
        tracing::debug!(
            product_id = %product_id,
            variant_id = %variant_id,
            quantity,
            "Updated cart quantity"
        );
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.inner.update(|state| state.items.clear());
        tracing::debug!("Cleared cart");
    }

    /// Σ(variant.price × quantity).
    #[must_use]
    pub fn get_total(&self) -> Decimal {
        self.inner.state().total()
    }

    /// Σ quantity across all lines.
    #[must_use]
    pub fn get_item_count(&self) -> u32 {
        self.inner.state().item_count()
    }

    /// Whether the shopper may add one more unit of a variant, given the
    /// quantity already in the cart and the variant's stock.
    #[must_use]
    pub fn can_increment(&self, product_id: &ProductId, variant: &ProductVariant) -> bool {
        let in_cart = self.find(product_id, &variant.id).map_or(0, |i| i.quantity);
        in_cart < variant.stock
    }

    /// Snapshot of the persisted state.
    #[must_use]
    pub fn state(&self) -> &CartState {
        self.inner.state()
    }
}

/// Clamp a requested quantity to `1..=variant.stock`.
///
/// Mirrors the quantity stepper on the product page. Returns 0 when the
/// variant is out of stock.
#[must_use]
pub fn clamp_to_stock(variant: &ProductVariant, quantity: u32) -> u32 {
    if variant.stock == 0 {
        return 0;
    }
    quantity.clamp(1, variant.stock)
}
