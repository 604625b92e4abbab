//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! fruittura catalog list --category dried-fruit --organic --sort rating
//! fruittura catalog list --search mango --max-price 900 --page 2
//! fruittura catalog show alphonso-mangoes
//! fruittura catalog categories
//! ```

use clap::Subcommand;
use rust_decimal::Decimal;

use fruittura_storefront::Storefront;
use fruittura_storefront::services::catalog::{CatalogProvider, ProductFilter, ProductSort};

use super::{CliError, load_catalog};
use crate::render;

/// Related products shown under a product.
const RELATED_LIMIT: usize = 4;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products matching a filter
    List {
        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Match against name or description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only organic products
        #[arg(long)]
        organic: bool,

        /// `newest`, `price-asc`, `price-desc` or `rating`
        #[arg(long, default_value = "newest")]
        sort: ProductSort,

        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one product with its variants and related products
    Show {
        /// Product slug
        slug: String,
    },
    /// List categories
    Categories,
    /// List featured products
    Featured,
}

pub async fn run(action: CatalogAction, storefront: &Storefront) -> Result<(), CliError> {
    let catalog = load_catalog(storefront)?;
    let currency = storefront.pricing().currency();

    match action {
        CatalogAction::List {
            category,
            search,
            min_price,
            max_price,
            organic,
            sort,
            page,
            limit,
        } => {
            let filter = ProductFilter {
                category,
                search,
                min_price,
                max_price,
                organic_only: organic,
                sort,
                page,
                limit,
            };
            let page = catalog.get_products(&filter).await?;
            render::product_page(&page, currency);
        }
        CatalogAction::Show { slug } => {
            let product = catalog.get_product(&slug).await?;
            let related = catalog.get_related_products(&product, RELATED_LIMIT).await?;
            render::product(&product, currency);
            render::product_list("You may also like", &related, currency);
        }
        CatalogAction::Categories => {
            render::categories(&catalog.get_categories().await?);
        }
        CatalogAction::Featured => {
            let featured = catalog.get_featured_products().await?;
            render::product_list("Featured", &featured, currency);
        }
    }
    Ok(())
}
