//! Integration tests for the Fruittura storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fruittura-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to confirmation, coupons, payment outcomes and teardown
//! - `persistence` - Stores surviving a restart over file storage
//!
//! This crate holds the shared fixtures: a small nut-and-dried-fruit catalog
//! plus scriptable payment fakes.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tempfile::TempDir;

use fruittura_core::{CategoryId, Money, ProductId, VariantId};
use fruittura_storefront::checkout::{
    GatewayOrder, PaymentError, PaymentGateway, PaymentHandoff, PaymentReceipt, PaymentWidget,
    WidgetOptions,
};
use fruittura_storefront::models::{AddressDraft, Category, Product, ProductVariant};
use fruittura_storefront::services::catalog::StaticCatalog;

/// Public key handed to the widget in tests.
pub const TEST_KEY_ID: &str = "rzp_test_fruittura";

fn variant(id: &str, price: i64, stock: u32) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(id),
        name: id.to_string(),
        weight: id.to_string(),
        price: Decimal::from(price),
        stock,
    }
}

fn product(
    id: &str,
    name: &str,
    category: (&str, &str),
    variants: Vec<ProductVariant>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        slug: id.to_string(),
        description: format!("{name}, packed fresh."),
        short_description: String::new(),
        category: category.0.to_string(),
        category_slug: category.1.to_string(),
        price: variants.first().map_or(Decimal::ZERO, |v| v.price),
        original_price: None,
        images: Vec::new(),
        stock: variants.iter().map(|v| v.stock).sum(),
        rating: 4.6,
        review_count: 12,
        is_organic: false,
        is_featured: false,
        variants,
        nutrition_info: None,
        origin: None,
        shelf_life: None,
    }
}

/// California almonds: 250g at ₹400 (stock 10), 500g at ₹750 (stock 2).
#[must_use]
pub fn almonds() -> Product {
    let mut almonds = product(
        "california-almonds",
        "California Almonds",
        ("Nuts", "nuts"),
        vec![variant("250g", 400, 10), variant("500g", 750, 2)],
    );
    almonds.is_featured = true;
    almonds
}

/// Medjool dates: 500g at ₹650 (stock 4).
#[must_use]
pub fn dates() -> Product {
    let mut dates = product(
        "medjool-dates",
        "Medjool Dates",
        ("Dried Fruits", "dried-fruits"),
        vec![variant("500g", 650, 4)],
    );
    dates.is_organic = true;
    dates
}

/// Catalog holding [`almonds`] and [`dates`].
#[must_use]
pub fn catalog() -> StaticCatalog {
    let categories = vec![
        Category {
            id: CategoryId::new("nuts"),
            name: "Nuts".to_string(),
            slug: "nuts".to_string(),
            description: String::new(),
            image: String::new(),
            product_count: 1,
        },
        Category {
            id: CategoryId::new("dried-fruits"),
            name: "Dried Fruits".to_string(),
            slug: "dried-fruits".to_string(),
            description: String::new(),
            image: String::new(),
            product_count: 1,
        },
    ];
    StaticCatalog::new(vec![almonds(), dates()], categories)
}

/// A complete shipping address.
#[must_use]
pub fn draft() -> AddressDraft {
    AddressDraft {
        name: "Priya Sharma".to_string(),
        phone: "9876543210".to_string(),
        line1: "12 MG Road".to_string(),
        line2: String::new(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411001".to_string(),
    }
}

/// Fresh scratch directory, deleted when the guard drops.
///
/// # Panics
///
/// Panics if the system temp directory is not writable.
#[must_use]
pub fn temp_data_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("fruittura-it-")
        .tempdir()
        .expect("create scratch dir")
}

/// Gateway that issues `order_test_<n>` handles and records each amount.
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    amounts: Arc<Mutex<Vec<i64>>>,
    fail: Option<String>,
}

impl FakeGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose order creation always fails with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            fail: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Amounts (minor units) of every order created so far.
    #[must_use]
    pub fn amounts(&self) -> Vec<i64> {
        self.amounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PaymentGateway for FakeGateway {
    async fn create_order(&self, amount: Money) -> Result<GatewayOrder, PaymentError> {
        if let Some(reason) = &self.fail {
            return Err(PaymentError::OrderCreation(reason.clone()));
        }
        let minor = amount.to_minor_units().ok_or(PaymentError::InvalidAmount)?;
        let count = {
            let mut amounts = self.amounts.lock().unwrap_or_else(PoisonError::into_inner);
            amounts.push(minor);
            amounts.len()
        };
        Ok(GatewayOrder {
            id: format!("order_test_{count}"),
            amount: minor,
            currency: amount.currency_code,
        })
    }
}

/// How the fake widget finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// Shopper pays.
    Pay,
    /// Shopper dismisses the widget.
    Dismiss,
    /// Payment is declined with this reason.
    Decline(String),
    /// Widget never resolves.
    Hang,
}

/// Widget that resolves with a scripted outcome and records the options it
/// was opened with.
#[derive(Debug, Clone)]
pub struct FakeWidget {
    outcome: WidgetOutcome,
    opened: Arc<Mutex<Vec<WidgetOptions>>>,
}

impl FakeWidget {
    #[must_use]
    pub fn new(outcome: WidgetOutcome) -> Self {
        Self {
            outcome,
            opened: Arc::default(),
        }
    }

    /// Options from every `open` call so far.
    #[must_use]
    pub fn opened(&self) -> Vec<WidgetOptions> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PaymentWidget for FakeWidget {
    async fn open(&self, options: WidgetOptions) -> Result<PaymentReceipt, PaymentError> {
        let order_id = options.order_id.clone();
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(options);

        match &self.outcome {
            WidgetOutcome::Pay => Ok(PaymentReceipt {
                payment_id: format!("pay_{order_id}"),
                order_id,
                signature: Some("sig_test".to_string()),
            }),
            WidgetOutcome::Dismiss => Err(PaymentError::Cancelled),
            WidgetOutcome::Decline(reason) => Err(PaymentError::Failed(reason.clone())),
            WidgetOutcome::Hang => std::future::pending().await,
        }
    }
}

/// Hand-off over the fakes, keyed with [`TEST_KEY_ID`].
#[must_use]
pub fn handoff(gateway: FakeGateway, widget: FakeWidget) -> PaymentHandoff<FakeGateway, FakeWidget> {
    PaymentHandoff::new(gateway, widget, TEST_KEY_ID)
}
