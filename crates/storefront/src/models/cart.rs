//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fruittura_core::{ProductId, VariantId};

use super::product::{Product, ProductVariant};

/// One (product, variant, quantity) line in the cart.
///
/// Unique by `(product.id, variant.id)`. Product and variant are snapshots
/// taken when the line was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub variant: ProductVariant,
    pub quantity: u32,
}

impl CartItem {
    /// Whether this line is keyed by the given product and variant.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, variant_id: &VariantId) -> bool {
        &self.product.id == product_id && &self.variant.id == variant_id
    }

    /// `variant.price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.variant.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Whether the stock of the selected variant allows one more unit.
    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.quantity < self.variant.stock
    }
}
