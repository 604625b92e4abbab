//! Two-step checkout: address capture, then payment.
//!
//! A [`CheckoutSession`] lives for as long as the checkout view is open. It
//! reads the cart and auth stores, asks the [`PricingEngine`] for totals and
//! hands off to the payment collaborators when the shopper places the order.
//!
//! ```text
//! Address --submit_address--> Payment --place_order--> Complete
//!    ^                           |
//!    +-------edit_address--------+
//! ```
//!
//! Failures while placing an order leave the session in `Payment` so the
//! shopper can retry. Tearing the session down (dropping it, or calling
//! [`CheckoutCloser::close`]) resolves any pending payment as
//! [`CheckoutError::SessionClosed`] and the cart is left untouched.

mod error;
mod payment;
mod validation;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::instrument;

use fruittura_core::{CheckoutStep, OrderId, OrderStatus, PaymentMethod};

pub use error::CheckoutError;
pub use payment::{
    GatewayOrder, MERCHANT_NAME, NoGateway, PAYMENT_DESCRIPTION, PaymentError, PaymentGateway,
    PaymentHandoff, PaymentReceipt, PaymentWidget, Prefill, WidgetOptions,
};
pub use validation::{AddressField, missing_fields};

use crate::error::add_breadcrumb;
use crate::models::{Address, AddressDraft, Order, User};
use crate::navigation::Navigation;
use crate::pricing::{AppliedCoupon, CouponSelection, OrderTotals, PricingEngine, PricingError};
use crate::store::{AuthStore, CartStore};

/// Result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    /// Confirmation view carrying the order id.
    pub navigation: Navigation,
}

/// Handle that tears a checkout session down from outside.
///
/// Cloneable and usable while the session itself is mutably borrowed by a
/// pending `place_order`.
#[derive(Debug, Clone)]
pub struct CheckoutCloser {
    closed: Arc<watch::Sender<bool>>,
}

impl CheckoutCloser {
    /// Close the session. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

/// Ephemeral checkout state. Never persisted.
#[derive(Debug)]
pub struct CheckoutSession {
    step: CheckoutStep,
    draft: AddressDraft,
    payment_method: PaymentMethod,
    coupon: CouponSelection,
    /// Extra strong references exist only while `place_order` runs.
    in_flight: Arc<()>,
    closed: Arc<watch::Sender<bool>>,
}

impl CheckoutSession {
    /// Open checkout for the current cart.
    ///
    /// The draft address is prefilled from the signed-in user's default
    /// address, or from their name and phone when they have none.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to buy. Its
    /// [`CheckoutError::redirect`] points at the cart view.
    pub fn begin(cart: &CartStore, auth: &AuthStore) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            tracing::debug!("Checkout entered with an empty cart");
            return Err(CheckoutError::EmptyCart);
        }

        let draft = auth.user().map(prefill).unwrap_or_default();
        let (closed, _) = watch::channel(false);

        tracing::info!(lines = cart.line_count(), "Checkout started");
        add_breadcrumb("checkout", "Checkout started", None);

        Ok(Self {
            step: CheckoutStep::Address,
            draft,
            payment_method: PaymentMethod::default(),
            coupon: CouponSelection::new(),
            in_flight: Arc::new(()),
            closed: Arc::new(closed),
        })
    }

    /// Carry a coupon chosen on the cart view into this session.
    #[must_use]
    pub fn with_coupon(mut self, coupon: CouponSelection) -> Self {
        self.coupon = coupon;
        self
    }

    /// Redirect to apply if the cart has emptied since checkout began.
    #[must_use]
    pub fn guard(&self, cart: &CartStore) -> Option<Navigation> {
        (cart.is_empty() && !self.step.is_terminal()).then_some(Navigation::Cart)
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn draft(&self) -> &AddressDraft {
        &self.draft
    }

    /// Edit the draft address. Allowed in any non-terminal step.
    pub const fn draft_mut(&mut self) -> &mut AddressDraft {
        &mut self.draft
    }

    /// Replace the draft with a saved address.
    pub fn use_saved_address(&mut self, address: &Address) {
        self.draft = AddressDraft::from(address);
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub const fn select_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Whether an order placement is in flight. Clears itself when the
    /// `place_order` future finishes or is dropped.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        Arc::strong_count(&self.in_flight) > 1
    }

    #[must_use]
    pub const fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.applied()
    }

    /// Apply a coupon, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` for blank or unknown codes. The previous coupon
    /// stays applied.
    pub fn apply_coupon(
        &mut self,
        pricing: &PricingEngine,
        code: &str,
    ) -> Result<&AppliedCoupon, PricingError> {
        pricing.apply_coupon(&mut self.coupon, code)
    }

    pub fn remove_coupon(&mut self) {
        self.coupon.remove();
    }

    /// Current order totals for the cart.
    #[must_use]
    pub fn totals(&self, cart: &CartStore, pricing: &PricingEngine) -> OrderTotals {
        pricing.quote(cart.get_total(), self.coupon.applied())
    }

    /// Handle for tearing this session down.
    #[must_use]
    pub fn closer(&self) -> CheckoutCloser {
        CheckoutCloser {
            closed: Arc::clone(&self.closed),
        }
    }

    /// Close the session. Any pending payment resolves as
    /// `CheckoutError::SessionClosed`.
    pub fn teardown(&self) {
        self.closed.send_replace(true);
    }

    /// Validate the address and advance to the payment step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` listing blank required fields, or
    /// `CheckoutError::WrongStep` outside the address step.
    pub fn submit_address(&mut self) -> Result<(), CheckoutError> {
        self.ensure_step(CheckoutStep::Address)?;
        validate(&self.draft)?;

        self.step = CheckoutStep::Payment;
        tracing::debug!("Checkout address accepted");
        Ok(())
    }

    /// Go back to the address step. The draft is kept.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` once the order is complete.
    pub fn edit_address(&mut self) -> Result<(), CheckoutError> {
        if self.step.is_terminal() {
            return Err(CheckoutError::WrongStep {
                expected: CheckoutStep::Payment,
                actual: self.step,
            });
        }
        self.step = CheckoutStep::Address;
        Ok(())
    }

    /// Place the order with the selected payment method.
    ///
    /// Online payments create a gateway order for the current total and open
    /// the payment widget for it. Cash on delivery skips both. On success the
    /// cart is cleared, the session becomes `Complete` and the returned
    /// navigation points at the confirmation view.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::WrongStep` outside the payment step
    /// - `CheckoutError::EmptyCart` if the cart emptied mid-flow
    /// - `CheckoutError::Validation` if the draft was blanked after submit
    /// - `CheckoutError::Payment` when the gateway or widget fails; the
    ///   session stays in `Payment` for a retry
    /// - `CheckoutError::SessionClosed` if the session was torn down while
    ///   the payment was pending
    #[instrument(skip_all, fields(payment_method = %self.payment_method))]
    pub async fn place_order<G, W>(
        &mut self,
        cart: &mut CartStore,
        auth: &AuthStore,
        pricing: &PricingEngine,
        payment: &PaymentHandoff<G, W>,
    ) -> Result<PlacedOrder, CheckoutError>
    where
        G: PaymentGateway,
        W: PaymentWidget,
    {
        self.ensure_step(CheckoutStep::Payment)?;
        self.ensure_open()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        validate(&self.draft)?;

        let totals = self.totals(cart, pricing);
        add_breadcrumb(
            "checkout",
            "Placing order",
            Some(&[("payment_method", self.payment_method.label())]),
        );

        let in_flight = Arc::clone(&self.in_flight);
        let outcome = match self.payment_method {
            PaymentMethod::Gateway => self
                .collect_payment(payment, &totals, auth)
                .await
                .map(|receipt| Some(receipt.payment_id)),
            PaymentMethod::CashOnDelivery => Ok(None),
        };
        drop(in_flight);

        let payment_reference = outcome.inspect_err(|err| {
            tracing::warn!(error = %err, "Order placement failed");
            add_breadcrumb("checkout", "Order placement failed", None);
        })?;

        Ok(self.complete(cart, totals, payment_reference))
    }

    async fn collect_payment<G, W>(
        &self,
        payment: &PaymentHandoff<G, W>,
        totals: &OrderTotals,
        auth: &AuthStore,
    ) -> Result<PaymentReceipt, CheckoutError>
    where
        G: PaymentGateway,
        W: PaymentWidget,
    {
        let mut closed = self.closed.subscribe();

        tokio::select! {
            receipt = payment.collect(totals.total_money(), &self.draft, auth.user()) => {
                Ok(receipt?)
            }
            _ = closed.wait_for(|closed| *closed) => {
                tracing::debug!("Checkout closed while payment was pending");
                Err(CheckoutError::SessionClosed)
            }
        }
    }

    fn complete(
        &mut self,
        cart: &mut CartStore,
        totals: OrderTotals,
        payment_reference: Option<String>,
    ) -> PlacedOrder {
        let order = Order {
            id: OrderId::generate(),
            items: cart.items().to_vec(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            coupon_code: totals.coupon_code,
            status: OrderStatus::Confirmed,
            address: self.draft.clone(),
            payment_method: self.payment_method,
            payment_reference,
            created_at: Utc::now(),
        };

        cart.clear_cart();
        self.step = CheckoutStep::Complete;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            payment_method = %order.payment_method,
            "Order placed"
        );

        let navigation = Navigation::OrderConfirmation {
            order_id: order.id.clone(),
        };
        PlacedOrder { order, navigation }
    }

    fn ensure_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    fn ensure_open(&self) -> Result<(), CheckoutError> {
        if *self.closed.borrow() {
            Err(CheckoutError::SessionClosed)
        } else {
            Ok(())
        }
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        self.closed.send_replace(true);
    }
}

fn prefill(user: &User) -> AddressDraft {
    user.default_address().map_or_else(
        || AddressDraft {
            name: user.name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            ..AddressDraft::default()
        },
        AddressDraft::from,
    )
}

fn validate(draft: &AddressDraft) -> Result<(), CheckoutError> {
    let missing = missing_fields(draft);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::Validation { missing })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::SessionToken;
    use crate::test_support::{address, almonds, draft, product, user, variant};

    fn cart_worth_800() -> CartStore {
        let mut cart = CartStore::in_memory();
        let dates = variant("1kg", 400, 10);
        cart.add_item(&product("dates", vec![dates.clone()]), &dates, 2);
        cart
    }

    fn session(cart: &CartStore) -> CheckoutSession {
        let mut session = CheckoutSession::begin(cart, &AuthStore::in_memory()).unwrap();
        *session.draft_mut() = draft();
        session
    }

    #[test]
    fn test_begin_with_empty_cart_redirects() {
        let err = CheckoutSession::begin(&CartStore::in_memory(), &AuthStore::in_memory())
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(err.redirect(), Some(Navigation::Cart));
    }

    #[test]
    fn test_prefill_from_user_name_and_phone() {
        let mut auth = AuthStore::in_memory();
        let mut shopper = user();
        shopper.phone = Some("9876543210".to_string());
        auth.login(shopper, SessionToken::new("t"));

        let session = CheckoutSession::begin(&cart_worth_800(), &auth).unwrap();

        assert_eq!(session.draft().name, "Priya Sharma");
        assert_eq!(session.draft().phone, "9876543210");
        assert_eq!(session.draft().city, "");
    }

    #[test]
    fn test_prefill_from_default_address() {
        let mut auth = AuthStore::in_memory();
        auth.login(user(), SessionToken::new("t"));
        auth.add_address(address("a1", true));

        let session = CheckoutSession::begin(&cart_worth_800(), &auth).unwrap();

        assert_eq!(session.draft(), &draft());
    }

    #[test]
    fn test_submit_address_validates() {
        let cart = cart_worth_800();
        let mut session = session(&cart);
        session.draft_mut().pincode.clear();

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
    fn test_edit_address_keeps_draft() {
        let cart = cart_worth_800();
        let mut session = session(&cart);
        session.submit_address().unwrap();
        assert_eq!(session.step(), CheckoutStep::Payment);

        session.edit_address().unwrap();

        assert_eq!(session.step(), CheckoutStep::Address);
        assert_eq!(session.draft(), &draft());
    }

    #[test]
    fn test_totals_with_coupon() {
        let cart = cart_worth_800();
        let pricing = PricingEngine::default();
        let mut session = session(&cart);
        session.apply_coupon(&pricing, "fruittura20").unwrap();

        let totals = session.totals(&cart, &pricing);

        assert_eq!(totals.shipping, Decimal::from(49));
        assert_eq!(totals.discount, Decimal::from(160));
        assert_eq!(totals.total, Decimal::from(689));
    }

    #[test]
    fn test_invalid_coupon_keeps_previous() {
        let cart = cart_worth_800();
        let pricing = PricingEngine::default();
        let mut session = session(&cart);
        session.apply_coupon(&pricing, "SAVE50").unwrap();

        assert!(session.apply_coupon(&pricing, "XYZ").is_err());
        assert_eq!(session.coupon().map(|c| c.code.as_str()), Some("SAVE50"));

        session.remove_coupon();
        assert_eq!(session.totals(&cart, &pricing).discount, Decimal::ZERO);
    }

    #[test]
    fn test_guard_after_cart_emptied() {
        let mut cart = cart_worth_800();
        let session = session(&cart);
        assert_eq!(session.guard(&cart), None);

        cart.clear_cart();
        assert_eq!(session.guard(&cart), Some(Navigation::Cart));
    }

    #[tokio::test]
    async fn test_place_order_requires_payment_step() {
        let mut cart = cart_worth_800();
        let mut session = session(&cart);

        let err = session
            .place_order(
                &mut cart,
                &AuthStore::in_memory(),
                &PricingEngine::default(),
                &PaymentHandoff::cash_only(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::WrongStep { .. }));
        assert_eq!(cart.get_item_count(), 2);
    }

    #[tokio::test]
    async fn test_cash_on_delivery_completes() {
        let (almonds, small, _) = almonds();
        let mut cart = CartStore::in_memory();
        cart.add_item(&almonds, &small, 3);
        let mut session = session(&cart);
        session.submit_address().unwrap();
        session.select_payment_method(PaymentMethod::CashOnDelivery);

        let placed = session
            .place_order(
                &mut cart,
                &AuthStore::in_memory(),
                &PricingEngine::default(),
                &PaymentHandoff::cash_only(),
            )
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(session.step(), CheckoutStep::Complete);
        assert!(!session.is_loading());
        assert_eq!(placed.order.total, Decimal::from(949));
        assert_eq!(placed.order.unit_count(), 3);
        assert_eq!(placed.order.status, OrderStatus::Confirmed);
        assert_eq!(placed.order.payment_reference, None);
        assert_eq!(
            placed.navigation,
            Navigation::OrderConfirmation {
                order_id: placed.order.id.clone()
            }
        );
    }

    #[tokio::test]
    async fn test_gateway_unavailable_stays_in_payment() {
        let mut cart = cart_worth_800();
        let mut session = session(&cart);
        session.submit_address().unwrap();

        let err = session
            .place_order(
                &mut cart,
                &AuthStore::in_memory(),
                &PricingEngine::default(),
                &PaymentHandoff::cash_only(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Payment(PaymentError::Unavailable(_))));
        assert!(err.is_retryable());
        assert_eq!(session.step(), CheckoutStep::Payment);
        assert!(!session.is_loading());
        assert_eq!(cart.get_item_count(), 2);
    }

    #[tokio::test]
    async fn test_closed_session_rejects_order() {
        let mut cart = cart_worth_800();
        let mut session = session(&cart);
        session.submit_address().unwrap();
        session.select_payment_method(PaymentMethod::CashOnDelivery);
        let closer = session.closer();

        closer.close();
        let err = session
            .place_order(
                &mut cart,
                &AuthStore::in_memory(),
                &PricingEngine::default(),
                &PaymentHandoff::cash_only(),
            )
            .await
            .unwrap_err();

        assert!(closer.is_closed());
        assert_eq!(err, CheckoutError::SessionClosed);
        assert!(!cart.is_empty());
    }

    /// Gateway whose order creation never answers.
    struct StalledGateway;

    impl PaymentGateway for StalledGateway {
        async fn create_order(
            &self,
            _amount: fruittura_core::Money,
        ) -> Result<GatewayOrder, PaymentError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_abandoned_placement_clears_loading() {
        let mut cart = cart_worth_800();
        let mut session = session(&cart);
        session.submit_address().unwrap();
        let payment = PaymentHandoff::new(StalledGateway, NoGateway, "key");

        let auth = AuthStore::in_memory();
        let pricing = PricingEngine::default();
        let placement = session.place_order(&mut cart, &auth, &pricing, &payment);
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), placement).await;

        assert!(timed_out.is_err());
        assert!(!session.is_loading());
        assert_eq!(session.step(), CheckoutStep::Payment);
        assert_eq!(cart.get_item_count(), 2);
    }

    #[test]
    fn test_drop_closes_session() {
        let cart = cart_worth_800();
        let closer = session(&cart).closer();
        assert!(closer.is_closed());
    }
}
