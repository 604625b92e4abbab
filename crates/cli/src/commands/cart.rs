//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! fruittura cart add california-almonds --variant 500g --quantity 2
//! fruittura cart set california-almonds --variant 500g --quantity 1
//! fruittura cart remove california-almonds --variant 500g
//! fruittura cart show --coupon WELCOME10
//! fruittura cart clear
//! ```

use clap::Subcommand;

use fruittura_storefront::Storefront;
use fruittura_storefront::pricing::CouponSelection;
use fruittura_storefront::services::catalog::CatalogProvider;
use fruittura_storefront::store::clamp_to_stock;

use super::{CliError, load_catalog, pick_variant};
use crate::render;

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product slug
        slug: String,

        /// Variant ID (defaults to the first variant)
        #[arg(short, long)]
        variant: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (0 removes it)
    Set {
        slug: String,

        #[arg(short, long)]
        variant: Option<String>,

        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        slug: String,

        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Show the cart and its totals
    Show {
        /// Coupon code to price the cart with
        #[arg(short, long)]
        coupon: Option<String>,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(action: CartAction, storefront: &mut Storefront) -> Result<(), CliError> {
    match action {
        CartAction::Add {
            slug,
            variant,
            quantity,
        } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            let variant = pick_variant(&product, variant.as_deref())?;

            let in_cart = storefront
                .cart()
                .find(&product.id, &variant.id)
                .map_or(0, |item| item.quantity);
            let allowed = clamp_to_stock(variant, in_cart.saturating_add(quantity))
                .saturating_sub(in_cart);

            if allowed == 0 {
                render::message(&format!("{} ({}) is out of stock", product.name, variant.weight));
                return Ok(());
            }
            if allowed < quantity {
                render::message(&format!("Only {allowed} more available"));
            }

            storefront.cart_mut().add_item(&product, variant, allowed);
            render::message(&format!("Added {allowed} x {} ({})", product.name, variant.weight));
        }
        CartAction::Set {
            slug,
            variant,
            quantity,
        } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            let variant = pick_variant(&product, variant.as_deref())?;
            let quantity = if quantity == 0 {
                0
            } else {
                clamp_to_stock(variant, quantity)
            };
            storefront
                .cart_mut()
                .update_quantity(&product.id, &variant.id, quantity);
        }
        CartAction::Remove { slug, variant } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            let variant = pick_variant(&product, variant.as_deref())?;
            storefront.cart_mut().remove_item(&product.id, &variant.id);
        }
        CartAction::Show { coupon } => {
            let mut selection = CouponSelection::new();
            if let Some(code) = coupon {
                storefront.pricing().apply_coupon(&mut selection, &code)?;
            }
            let totals = storefront.quote(selection.applied());
            render::cart(storefront.cart(), &totals);
        }
        CartAction::Clear => {
            storefront.cart_mut().clear_cart();
            render::message("Cart cleared");
        }
    }
    Ok(())
}
