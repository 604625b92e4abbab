//! Product data provider.
//!
//! [`CatalogProvider`] is the contract the shop, product and home views read
//! through. [`StaticCatalog`] implements it over an in-memory product list,
//! optionally loaded from a JSON file of the form
//! `{"products": [...], "categories": [...]}`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, Product};

/// Products per page when the filter does not say.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Errors that can occur while reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this slug.
    #[error("product not found: {0}")]
    NotFound(String),

    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result ordering on the shop page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// Highest rated first.
    Rating,
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Shop page filter. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Only organic products when set.
    #[serde(default)]
    pub organic_only: bool,
    #[serde(default)]
    pub sort: ProductSort,
    /// 1-based. Defaults to the first page.
    pub page: Option<usize>,
    /// Defaults to [`DEFAULT_PAGE_SIZE`].
    pub limit: Option<usize>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && &product.category_slug != category
        {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| product.price < min)
            || self.max_price.is_some_and(|max| product.price > max)
        {
            return false;
        }

        !self.organic_only || product.is_organic
    }
}

/// One page of filtered products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl ProductPage {
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}

/// Source of catalog data.
pub trait CatalogProvider {
    /// Filtered, sorted and paginated products.
    fn get_products(
        &self,
        filter: &ProductFilter,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;

    /// A single product by slug.
    fn get_product(&self, slug: &str) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn get_categories(&self) -> impl Future<Output = Result<Vec<Category>, CatalogError>> + Send;

    fn get_featured_products(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Up to `limit` other products from the same category.
    fn get_related_products(
        &self,
        product: &Product,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Arc<Vec<Product>>,
    categories: Arc<Vec<Category>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    categories: Vec<Category>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read and
    /// `CatalogError::Parse` if it is not a valid catalog.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the text is not a valid catalog.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Ok(Self::new(file.products, file.categories))
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    fn query(&self, filter: &ProductFilter) -> ProductPage {
        let mut matches: Vec<&Product> =
            self.products.iter().filter(|p| filter.matches(p)).collect();

        match filter.sort {
            ProductSort::Newest => {}
            ProductSort::PriceAsc => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => matches.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Rating => matches.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let total = matches.len();
        let products = matches
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        ProductPage {
            products,
            total,
            page,
            limit,
        }
    }
}

impl CatalogProvider for StaticCatalog {
    async fn get_products(&self, filter: &ProductFilter) -> Result<ProductPage, CatalogError> {
        Ok(self.query(filter))
    }

    async fn get_product(&self, slug: &str) -> Result<Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    async fn get_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.to_vec())
    }

    async fn get_featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.iter().filter(|p| p.is_featured).cloned().collect())
    }

    async fn get_related_products(
        &self,
        product: &Product,
        limit: usize,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.category_slug == product.category_slug && p.id != product.id)
            .take(limit)
            .cloned()
            .collect())
    }
}
