//! Catalog types supplied by the product data provider.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fruittura_core::{CategoryId, ProductId, VariantId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL handle, unique across the catalog.
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    /// Display name of the category.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_slug: String,
    /// Base price. A selected variant's price takes precedence.
    pub price: Decimal,
    /// Pre-discount price shown struck through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_info: Option<NutritionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life: Option<String>,
}

impl Product {
    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, variant_id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == variant_id)
    }

    /// The variant preselected on the product page (the first one listed).
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Whether any variant can still be bought.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.variants.iter().any(|v| v.stock > 0)
    }

    /// Whole-number percentage saved against `original_price`, if discounted.
    #[must_use]
    pub fn savings_percent(&self) -> Option<u32> {
        use rust_decimal::prelude::ToPrimitive;

        let original = self.original_price?;
        if original <= self.price || original.is_zero() {
            return None;
        }
        ((original - self.price) * Decimal::ONE_HUNDRED / original)
            .round()
            .to_u32()
    }
}

/// A purchasable pack size of a product (e.g., 250g, 500g).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub name: String,
    /// Weight label shown to the shopper.
    pub weight: String,
    pub price: Decimal,
    /// Upper bound for the quantity a shopper may select.
    pub stock: u32,
}

/// Per-100g nutrition facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub calories: u32,
    pub protein: String,
    pub fat: String,
    pub carbs: String,
    pub fiber: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub product_count: u32,
}
