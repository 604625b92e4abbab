//! End-to-end checkout tests.
//!
//! These drive a [`Storefront`] from browsing through order confirmation
//! with fake payment collaborators standing in for the hosted gateway.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;

use fruittura_core::{CheckoutStep, PaymentMethod, VariantId};
use fruittura_integration_tests::{
    FakeGateway, FakeWidget, TEST_KEY_ID, WidgetOutcome, almonds, catalog, dates, draft, handoff,
};
use fruittura_storefront::Storefront;
use fruittura_storefront::checkout::{AddressField, CheckoutError, PaymentError};
use fruittura_storefront::navigation::Navigation;
use fruittura_storefront::services::auth::{self, LoginForm};
use fruittura_storefront::services::catalog::{CatalogProvider, ProductFilter};

// =============================================================================
// Helpers
// =============================================================================

/// Storefront with 2 x almonds 250g (₹800) in the cart.
fn storefront_with_almonds() -> Storefront {
    let mut storefront = Storefront::in_memory();
    let product = almonds();
    let variant = product.variant(&VariantId::new("250g")).unwrap().clone();
    storefront.cart_mut().add_item(&product, &variant, 2);
    storefront
}

fn sign_in(storefront: &mut Storefront) {
    auth::login(
        LoginForm {
            email: "priya@fruittura.in".to_string(),
            password: SecretString::from("correct-horse".to_string()),
        },
        storefront.auth_mut(),
    )
    .unwrap();
}

// =============================================================================
// Entry
// =============================================================================

#[test]
fn test_empty_cart_redirects_to_cart() {
    let storefront = Storefront::in_memory();

    let err = storefront.begin_checkout().unwrap_err();

    assert_eq!(err, CheckoutError::EmptyCart);
    assert_eq!(err.redirect(), Some(Navigation::Cart));
    assert_eq!(err.user_message(), "Your cart is empty");
}

#[tokio::test]
async fn test_catalog_to_cart() {
    let catalog = catalog();
    let mut storefront = Storefront::in_memory();

    let nuts = catalog
        .get_products(&ProductFilter {
            category: Some("nuts".to_string()),
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(nuts.total, 1);

    let product = catalog.get_product("medjool-dates").await.unwrap();
    let variant = product.default_variant().unwrap().clone();
    storefront.cart_mut().add_item(&product, &variant, 1);
    storefront.cart_mut().add_item(&product, &variant, 1);

    assert_eq!(storefront.cart().line_count(), 1);
    assert_eq!(storefront.cart().get_item_count(), 2);
    assert_eq!(storefront.cart().get_total(), Decimal::from(1300));
}

// =============================================================================
// Totals
// =============================================================================

#[test]
fn test_coupon_total_with_shipping() {
    let storefront = storefront_with_almonds();
    let mut session = storefront.begin_checkout().unwrap();

    session.apply_coupon(storefront.pricing(), "fruittura20").unwrap();
    let totals = session.totals(storefront.cart(), storefront.pricing());

    assert_eq!(totals.subtotal, Decimal::from(800));
    assert_eq!(totals.shipping, Decimal::from(49));
    assert_eq!(totals.discount, Decimal::from(160));
    assert_eq!(totals.total, Decimal::from(689));
    assert_eq!(totals.coupon_code.as_deref(), Some("FRUITTURA20"));
}

#[test]
fn test_free_shipping_above_threshold() {
    let mut storefront = Storefront::in_memory();
    let product = dates();
    let variant = product.default_variant().unwrap().clone();
    storefront.cart_mut().add_item(&product, &variant, 2);

    let totals = storefront.quote(None);

    assert_eq!(totals.subtotal, Decimal::from(1300));
    assert!(totals.ships_free());
    assert_eq!(totals.total, Decimal::from(1300));
}

// =============================================================================
// Address step
// =============================================================================

#[test]
fn test_missing_pincode_blocks_payment_step() {
    let storefront = storefront_with_almonds();
    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.draft_mut().pincode = "  ".to_string();

    let err = session.submit_address().unwrap_err();

    assert_eq!(
        err,
        CheckoutError::Validation {
            missing: vec![AddressField::Pincode]
        }
    );
    assert_eq!(session.step(), CheckoutStep::Address);
}

#[test]
fn test_signed_in_prefill() {
    let mut storefront = storefront_with_almonds();
    sign_in(&mut storefront);

    let session = storefront.begin_checkout().unwrap();

    assert_eq!(session.draft().name, "priya");
    assert!(session.draft().line1.is_empty());
}

// =============================================================================
// Payment
// =============================================================================

#[tokio::test]
async fn test_gateway_payment_completes_order() {
    let mut storefront = storefront_with_almonds();
    sign_in(&mut storefront);
    let gateway = FakeGateway::new();
    let widget = FakeWidget::new(WidgetOutcome::Pay);
    let payment = handoff(gateway.clone(), widget.clone());

    let mut session = storefront.begin_checkout().unwrap();
    session.apply_coupon(storefront.pricing(), "FRUITTURA20").unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();
    session.select_payment_method(PaymentMethod::Gateway);

    let placed = storefront.place_order(&mut session, &payment).await.unwrap();

    assert_eq!(gateway.amounts(), vec![68_900]);
    let opened = widget.opened();
    let options = opened.first().unwrap();
    assert_eq!(options.key, TEST_KEY_ID);
    assert_eq!(options.amount, 68_900);
    assert_eq!(options.order_id, "order_test_1");
    assert_eq!(options.prefill.name, "Priya Sharma");
    assert_eq!(options.prefill.email, "priya@fruittura.in");
    assert_eq!(options.prefill.contact, "9876543210");

    assert_eq!(placed.order.total, Decimal::from(689));
    assert_eq!(
        placed.order.payment_reference.as_deref(),
        Some("pay_order_test_1")
    );
    assert_eq!(
        placed.navigation,
        Navigation::OrderConfirmation {
            order_id: placed.order.id.clone()
        }
    );
    assert!(storefront.cart().is_empty());
    assert_eq!(session.step(), CheckoutStep::Complete);
}

#[tokio::test]
async fn test_dismissed_widget_keeps_cart() {
    let mut storefront = storefront_with_almonds();
    let payment = handoff(FakeGateway::new(), FakeWidget::new(WidgetOutcome::Dismiss));

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();

    let err = storefront.place_order(&mut session, &payment).await.unwrap_err();

    assert_eq!(err, CheckoutError::Payment(PaymentError::Cancelled));
    assert!(err.is_retryable());
    assert_eq!(session.step(), CheckoutStep::Payment);
    assert!(!session.is_loading());
    assert_eq!(storefront.cart().get_item_count(), 2);
}

#[tokio::test]
async fn test_retry_after_declined_payment() {
    let mut storefront = storefront_with_almonds();
    let declined = handoff(
        FakeGateway::new(),
        FakeWidget::new(WidgetOutcome::Decline("card declined".to_string())),
    );

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();

    let err = storefront.place_order(&mut session, &declined).await.unwrap_err();
    assert_eq!(err.user_message(), "Payment failed. Please try again.");

    let paying = handoff(FakeGateway::new(), FakeWidget::new(WidgetOutcome::Pay));
    let placed = storefront.place_order(&mut session, &paying).await.unwrap();

    assert_eq!(placed.order.items.len(), 1);
    assert!(storefront.cart().is_empty());
}

#[tokio::test]
async fn test_order_creation_failure_skips_widget() {
    let mut storefront = storefront_with_almonds();
    let widget = FakeWidget::new(WidgetOutcome::Pay);
    let payment = handoff(FakeGateway::failing("503"), widget.clone());

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();

    let err = storefront.place_order(&mut session, &payment).await.unwrap_err();

    assert_eq!(
        err,
        CheckoutError::Payment(PaymentError::OrderCreation("503".to_string()))
    );
    assert!(widget.opened().is_empty());
    assert!(!storefront.cart().is_empty());
}

#[tokio::test]
async fn test_teardown_resolves_pending_payment() {
    let mut storefront = storefront_with_almonds();
    let payment = handoff(FakeGateway::new(), FakeWidget::new(WidgetOutcome::Hang));

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();
    let closer = session.closer();

    let (result, ()) = tokio::join!(storefront.place_order(&mut session, &payment), async {
        tokio::task::yield_now().await;
        closer.close();
    });

    assert_eq!(result.unwrap_err(), CheckoutError::SessionClosed);
    assert_eq!(session.step(), CheckoutStep::Payment);
    assert_eq!(storefront.cart().get_item_count(), 2);
}

#[tokio::test]
async fn test_timed_out_payment_can_be_retried() {
    let mut storefront = storefront_with_almonds();
    let hanging = handoff(FakeGateway::new(), FakeWidget::new(WidgetOutcome::Hang));

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        storefront.place_order(&mut session, &hanging),
    )
    .await;

    assert!(timed_out.is_err());
    assert!(!session.is_loading());
    assert_eq!(session.step(), CheckoutStep::Payment);
    assert_eq!(storefront.cart().get_item_count(), 2);

    let paying = handoff(FakeGateway::new(), FakeWidget::new(WidgetOutcome::Pay));
    storefront.place_order(&mut session, &paying).await.unwrap();
    assert_eq!(session.step(), CheckoutStep::Complete);
}

#[tokio::test]
async fn test_cash_on_delivery_skips_gateway() {
    let mut storefront = storefront_with_almonds();
    let gateway = FakeGateway::new();
    let widget = FakeWidget::new(WidgetOutcome::Hang);
    let payment = handoff(gateway.clone(), widget.clone());

    let mut session = storefront.begin_checkout().unwrap();
    *session.draft_mut() = draft();
    session.submit_address().unwrap();
    session.select_payment_method(PaymentMethod::CashOnDelivery);

    let placed = storefront.place_order(&mut session, &payment).await.unwrap();

    assert_eq!(placed.order.total, Decimal::from(849));
    assert_eq!(placed.order.payment_method, PaymentMethod::CashOnDelivery);
    assert!(placed.order.payment_reference.is_none());
    assert!(gateway.amounts().is_empty());
    assert!(widget.opened().is_empty());
    assert!(storefront.cart().is_empty());
}
