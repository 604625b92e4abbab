//! Terminal output.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;

use fruittura_core::{CurrencyCode, Money};
use fruittura_storefront::checkout::AddressField;
use fruittura_storefront::models::{Category, Order, Product, User};
use fruittura_storefront::navigation::Navigation;
use fruittura_storefront::pricing::OrderTotals;
use fruittura_storefront::services::catalog::ProductPage;
use fruittura_storefront::store::{CartStore, WishlistStore};

fn price(amount: Decimal, currency: CurrencyCode) -> String {
    Money::new(amount, currency).display()
}

pub fn message(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stderr)]
pub fn failure(text: &str) {
    eprintln!("error: {text}");
}

pub fn navigation(next: &Navigation) {
    println!("-> {}", next.path());
}

pub fn product_page(page: &ProductPage, currency: CurrencyCode) {
    println!(
        "Showing {} of {} products (page {} of {})",
        page.products.len(),
        page.total,
        page.page,
        page.total_pages().max(1)
    );
    for product in &page.products {
        product_line(product, currency);
    }
}

pub fn product_list(title: &str, products: &[Product], currency: CurrencyCode) {
    if products.is_empty() {
        return;
    }
    println!("\n{title}");
    for product in products {
        product_line(product, currency);
    }
}

fn product_line(product: &Product, currency: CurrencyCode) {
    let organic = if product.is_organic { " [organic]" } else { "" };
    println!(
        "  {:<28} {:>8}  {:.1}★  {}{organic}",
        product.slug,
        price(product.price, currency),
        product.rating,
        product.name,
    );
}

pub fn product(product: &Product, currency: CurrencyCode) {
    println!("{} ({})", product.name, product.category);
    if !product.short_description.is_empty() {
        println!("{}", product.short_description);
    }
    match (product.original_price, product.savings_percent()) {
        (Some(original), Some(savings)) => println!(
            "{}  (was {}, save {savings}%)",
            price(product.price, currency),
            price(original, currency)
        ),
        _ => println!("{}", price(product.price, currency)),
    }
    for variant in &product.variants {
        let stock = if variant.stock == 0 {
            "out of stock".to_string()
        } else {
            format!("{} in stock", variant.stock)
        };
        println!(
            "  - {:<10} {:<8} {:>8}  {stock}",
            variant.id,
            variant.weight,
            price(variant.price, currency)
        );
    }
}

pub fn categories(categories: &[Category]) {
    for category in categories {
        println!(
            "  {:<20} {} ({} products)",
            category.slug, category.name, category.product_count
        );
    }
}

pub fn cart(cart: &CartStore, totals: &OrderTotals) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        let hint = if item.can_increment() { "" } else { " (max)" };
        println!(
            "  {:<28} {:<8} x{:<3}{hint} {:>8}",
            item.product.name,
            item.variant.weight,
            item.quantity,
            totals.money(item.line_total()).display(),
        );
    }
    println!("  {} items", cart.get_item_count());
    self::totals(totals);
}

pub fn totals(totals: &OrderTotals) {
    println!("Subtotal  {:>10}", totals.money(totals.subtotal).display());
    if totals.ships_free() {
        println!("Shipping  {:>10}", "FREE");
    } else {
        println!("Shipping  {:>10}", totals.money(totals.shipping).display());
    }
    if !totals.discount.is_zero() {
        println!(
            "Discount  {:>10}  ({})",
            format!("-{}", totals.money(totals.discount).display()),
            totals.coupon_code.as_deref().unwrap_or_default()
        );
    }
    println!("Total     {:>10}", totals.total_money().display());
    if let Some(remaining) = totals.amount_to_free_shipping() {
        println!(
            "Add {} more for free shipping",
            totals.money(remaining).display()
        );
    }
}

pub fn wishlist(wishlist: &WishlistStore, currency: CurrencyCode) {
    if wishlist.is_empty() {
        println!("Your wishlist is empty");
        return;
    }
    for item in wishlist.items() {
        println!(
            "  {:<28} {:>8}  saved {}",
            item.product.name,
            price(item.product.price, currency),
            item.added_at.format("%Y-%m-%d")
        );
    }
}

pub fn user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    if let Some(phone) = &user.phone {
        println!("Phone: {phone}");
    }
    for address in &user.addresses {
        let default = if address.is_default { " (default)" } else { "" };
        println!(
            "  {}{default}: {}, {}, {} {} {}",
            address.id,
            address.name,
            address.line1,
            address.city,
            address.state,
            address.pincode
        );
    }
}

pub fn missing_fields(missing: &[AddressField]) {
    for field in missing {
        println!("  missing: {field}");
    }
}

pub fn order(order: &Order, currency: CurrencyCode) {
    println!(
        "Order {} confirmed: {} items, {} total, {}",
        order.id,
        order.unit_count(),
        price(order.total, currency),
        order.payment_method
    );
}
