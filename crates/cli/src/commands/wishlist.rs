//! Wishlist commands.

use clap::Subcommand;

use fruittura_storefront::Storefront;
use fruittura_storefront::services::catalog::CatalogProvider;

use super::{CliError, load_catalog};
use crate::render;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Save a product
    Add { slug: String },
    /// Remove a saved product
    Remove { slug: String },
    /// Save the product if absent, remove it otherwise
    Toggle { slug: String },
    /// List saved products
    Show,
    /// Remove every saved product
    Clear,
}

pub async fn run(action: WishlistAction, storefront: &mut Storefront) -> Result<(), CliError> {
    match action {
        WishlistAction::Add { slug } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            if !storefront.wishlist_mut().add_item(&product) {
                render::message(&format!("{} is already in your wishlist", product.name));
            }
        }
        WishlistAction::Remove { slug } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            storefront.wishlist_mut().remove_item(&product.id);
        }
        WishlistAction::Toggle { slug } => {
            let product = load_catalog(storefront)?.get_product(&slug).await?;
            let saved = storefront.wishlist_mut().toggle(&product);
            let verb = if saved { "Saved" } else { "Removed" };
            render::message(&format!("{verb} {}", product.name));
        }
        WishlistAction::Show => {
            render::wishlist(storefront.wishlist(), storefront.pricing().currency());
        }
        WishlistAction::Clear => storefront.wishlist_mut().clear_wishlist(),
    }
    Ok(())
}
