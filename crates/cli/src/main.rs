//! Fruittura CLI - drive the storefront from a terminal.
//!
//! Stores persist under `FRUITTURA_DATA_DIR`, so a cart built in one
//! invocation is still there in the next.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! fruittura catalog list --category nuts --sort price-asc
//!
//! # Fill the cart and check the total with a coupon
//! fruittura cart add california-almonds --variant 500g --quantity 2
//! fruittura cart show --coupon FRUITTURA20
//!
//! # Sign in and pay on delivery
//! fruittura account login -e priya@fruittura.in -p '...'
//! fruittura checkout --cod --line1 "12 MG Road" --city Pune --state Maharashtra --pincode 411001
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and show products
//! - `cart` - Add, remove, update, show and clear cart lines
//! - `wishlist` - Add, remove, show and clear saved products
//! - `account` - Register, login, logout, profile and address book
//! - `checkout` - Place an order for the current cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use fruittura_storefront::Storefront;
use fruittura_storefront::config::StorefrontConfig;
use fruittura_storefront::telemetry::{DEFAULT_LOG_FILTER, init_sentry, init_tracing};

mod commands;
mod render;

use commands::CliError;

#[derive(Parser)]
#[command(name = "fruittura")]
#[command(author, version, about = "Fruittura storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistAction,
    },
    /// Manage the signed-in account
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Place an order for the current cart
    Checkout(commands::checkout::CheckoutArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            render::failure(&format!("Invalid configuration: {e}"));
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(DEFAULT_LOG_FILTER);

    let mut storefront = Storefront::open(config);

    if let Err(e) = run(cli, &mut storefront).await {
        e.report();
        tracing::debug!(error = %e, "Command failed");
        render::failure(&e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, storefront: &mut Storefront) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action, storefront).await,
        Commands::Cart { action } => commands::cart::run(action, storefront).await,
        Commands::Wishlist { action } => commands::wishlist::run(action, storefront).await,
        Commands::Account { action } => commands::account::run(action, storefront),
        Commands::Checkout(args) => commands::checkout::run(args, storefront).await,
    }
}
