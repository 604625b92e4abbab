//! Persistence tests over file storage.
//!
//! Each test opens a storefront on a fresh temp directory, mutates it, drops
//! it and opens a second one on the same directory, as a new CLI invocation
//! would.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use fruittura_core::VariantId;
use fruittura_integration_tests::{almonds, dates, draft, temp_data_dir};
use fruittura_storefront::Storefront;
use fruittura_storefront::config::StorefrontConfig;
use fruittura_storefront::navigation::Navigation;
use fruittura_storefront::services::auth::{self, RegistrationForm};

fn config(dir: &std::path::Path) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    }
}

fn registration() -> RegistrationForm {
    RegistrationForm {
        name: "Priya Sharma".to_string(),
        email: "priya@fruittura.in".to_string(),
        phone: "9876543210".to_string(),
        password: SecretString::from("Sunflower9".to_string()),
        confirm_password: SecretString::from("Sunflower9".to_string()),
        accept_terms: true,
    }
}

#[test]
fn test_stores_survive_restart() {
    let dir = temp_data_dir();
    let product = almonds();
    let variant = product.variant(&VariantId::new("500g")).unwrap().clone();

    {
        let mut storefront = Storefront::open(config(dir.path()));
        storefront.cart_mut().add_item(&product, &variant, 2);
        storefront.wishlist_mut().add_item(&dates());
        let next = auth::register(registration(), storefront.auth_mut()).unwrap();
        assert_eq!(next, Navigation::Profile);
    }

    let reopened = Storefront::open(config(dir.path()));

    assert_eq!(reopened.cart().get_item_count(), 2);
    assert_eq!(reopened.cart().items().first().unwrap().variant.id, variant.id);
    assert!(reopened.wishlist().is_in_wishlist(&dates().id));
    let user = reopened.auth().user().unwrap();
    assert_eq!(user.name, "Priya Sharma");
    assert_eq!(user.phone.as_deref(), Some("9876543210"));
    assert!(reopened.auth().token().is_some());
}

#[test]
fn test_blobs_use_versioned_envelope() {
    let dir = temp_data_dir();
    let product = dates();
    let variant = product.default_variant().unwrap().clone();

    let mut storefront = Storefront::open(config(dir.path()));
    storefront.cart_mut().add_item(&product, &variant, 1);

    let raw = std::fs::read_to_string(dir.path().join("fruittura-cart.json")).unwrap();
    let blob: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(blob.get("version").is_some_and(serde_json::Value::is_u64));
    let items = blob
        .get("state")
        .and_then(|state| state.get("items"))
        .and_then(serde_json::Value::as_array)
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[test]
fn test_logout_keeps_cart_and_wishlist() {
    let dir = temp_data_dir();
    let product = almonds();
    let variant = product.default_variant().unwrap().clone();

    {
        let mut storefront = Storefront::open(config(dir.path()));
        auth::register(registration(), storefront.auth_mut()).unwrap();
        storefront.cart_mut().add_item(&product, &variant, 1);
        storefront.wishlist_mut().add_item(&product);
        assert_eq!(auth::logout(storefront.auth_mut()), Navigation::Home);
    }

    let reopened = Storefront::open(config(dir.path()));

    assert!(!reopened.auth().is_authenticated());
    assert_eq!(reopened.cart().line_count(), 1);
    assert_eq!(reopened.wishlist().len(), 1);
}

#[test]
fn test_saved_address_prefills_next_checkout() {
    let dir = temp_data_dir();
    let product = almonds();
    let variant = product.default_variant().unwrap().clone();

    {
        let mut storefront = Storefront::open(config(dir.path()));
        auth::register(registration(), storefront.auth_mut()).unwrap();
        let address = draft().into_address(fruittura_core::AddressId::new("addr-1"), true);
        storefront.auth_mut().add_address(address);
        storefront.cart_mut().add_item(&product, &variant, 1);
    }

    let reopened = Storefront::open(config(dir.path()));
    let session = reopened.begin_checkout().unwrap();

    assert_eq!(session.draft(), &draft());
}

#[test]
fn test_corrupt_blob_falls_back_to_empty() {
    let dir = temp_data_dir();
    std::fs::write(dir.path().join("fruittura-cart.json"), "{not json").unwrap();

    let storefront = Storefront::open(config(dir.path()));

    assert!(storefront.cart().is_empty());
}

#[test]
fn test_scratch_dir_removed_after_failed_test() {
    let outcome = std::panic::catch_unwind(|| {
        let dir = temp_data_dir();
        let product = dates();
        let variant = product.default_variant().unwrap().clone();
        let mut storefront = Storefront::open(config(dir.path()));
        storefront.cart_mut().add_item(&product, &variant, 1);
        let path = dir.path().to_path_buf();
        assert!(path.join("fruittura-cart.json").exists());
        std::panic::panic_any(path);
    });

    let path = outcome.unwrap_err().downcast::<std::path::PathBuf>().unwrap();
    assert!(!path.exists());
}
