//! Fixtures shared by unit tests.

use rust_decimal::Decimal;

use fruittura_core::{AddressId, Email, ProductId, UserId, VariantId};

use crate::models::{Address, AddressDraft, Product, ProductVariant, User};

pub fn variant(id: &str, price: i64, stock: u32) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(id),
        name: String::new(),
        weight: id.to_string(),
        price: Decimal::from(price),
        stock,
    }
}

pub fn product(id: &str, variants: Vec<ProductVariant>) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: id.to_string(),
        description: String::new(),
        short_description: String::new(),
        category: "Nuts".to_string(),
        category_slug: "nuts".to_string(),
        price: variants.first().map_or(Decimal::ZERO, |v| v.price),
        original_price: None,
        images: Vec::new(),
        stock: variants.iter().map(|v| v.stock).sum(),
        rating: 4.5,
        review_count: 0,
        is_organic: false,
        is_featured: false,
        variants,
        nutrition_info: None,
        origin: None,
        shelf_life: None,
    }
}

/// Almonds with a 250g (₹300, stock 5) and a 500g (₹550, stock 3) variant.
pub fn almonds() -> (Product, ProductVariant, ProductVariant) {
    let small = variant("250g", 300, 5);
    let large = variant("500g", 550, 3);
    (
        product("almonds", vec![small.clone(), large.clone()]),
        small,
        large,
    )
}

#[allow(clippy::unwrap_used)]
pub fn user() -> User {
    User::new(
        UserId::new("u1"),
        Email::parse("priya@fruittura.in").unwrap(),
        "Priya Sharma",
    )
}

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

pub fn address(id: &str, is_default: bool) -> Address {
    draft().into_address(AddressId::new(id), is_default)
}
