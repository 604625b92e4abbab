//! Subcommand implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use thiserror::Error;

use fruittura_core::VariantId;
use fruittura_storefront::checkout::CheckoutError;
use fruittura_storefront::config::ConfigError;
use fruittura_storefront::error::AppError;
use fruittura_storefront::models::{Product, ProductVariant};
use fruittura_storefront::pricing::PricingError;
use fruittura_storefront::services::auth::AuthError;
use fruittura_storefront::services::catalog::{CatalogError, StaticCatalog};
use fruittura_storefront::Storefront;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// No catalog file is configured.
    #[error("No catalog configured. Set FRUITTURA_CATALOG_PATH to a JSON catalog file.")]
    NoCatalog,

    /// The product has no variant with this ID.
    #[error("{product} has no variant {variant}")]
    UnknownVariant { product: String, variant: String },

    /// The product cannot be bought at all.
    #[error("{0} has no purchasable variants")]
    NoVariants(String),
}

impl CliError {
    /// Message printed for the shopper.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Capture storefront failures to Sentry.
    pub fn report(&self) {
        if let Self::App(err) = self {
            err.report();
        }
    }
}

macro_rules! from_app_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(err: $source) -> Self {
                    Self::App(AppError::from(err))
                }
            }
        )*
    };
}

from_app_error!(CatalogError, CheckoutError, AuthError, PricingError, ConfigError);

/// Load the configured catalog file.
fn load_catalog(storefront: &Storefront) -> Result<StaticCatalog, CliError> {
    let path = storefront
        .config()
        .catalog_path
        .as_deref()
        .ok_or(CliError::NoCatalog)?;
    Ok(StaticCatalog::from_file(path)?)
}

/// The requested variant, or the product's default one.
fn pick_variant<'a>(
    product: &'a Product,
    variant: Option<&str>,
) -> Result<&'a ProductVariant, CliError> {
    match variant {
        Some(id) => product
            .variant(&VariantId::new(id))
            .ok_or_else(|| CliError::UnknownVariant {
                product: product.name.clone(),
                variant: id.to_string(),
            }),
        None => product
            .default_variant()
            .ok_or_else(|| CliError::NoVariants(product.name.clone())),
    }
}
