//! Application shell owning the stores.
//!
//! A [`Storefront`] is built once per process (or per test) and handed to
//! whatever surface drives it. There are no globals; two storefronts over
//! different backends are fully independent.

use std::sync::Arc;

use crate::checkout::{
    CheckoutError, CheckoutSession, PaymentGateway, PaymentHandoff, PaymentWidget, PlacedOrder,
};
use crate::config::StorefrontConfig;
use crate::pricing::{AppliedCoupon, OrderTotals, PricingEngine};
use crate::store::{AuthStore, CartStore, FileStorage, MemoryStorage, StorageBackend, WishlistStore};

/// The cart, wishlist and auth stores plus the pricing engine.
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    pricing: PricingEngine,
    cart: CartStore,
    wishlist: WishlistStore,
    auth: AuthStore,
}

impl Storefront {
    /// Open the stores from files under `config.data_dir`.
    #[must_use]
    pub fn open(config: StorefrontConfig) -> Self {
        let backend = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::with_backend(config, backend)
    }

    /// Open the stores from an arbitrary backend.
    #[must_use]
    pub fn with_backend(config: StorefrontConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let prefix = config.storage_prefix.as_str();
        let cart = CartStore::load(Arc::clone(&backend), prefix);
        let wishlist = WishlistStore::load(Arc::clone(&backend), prefix);
        let auth = AuthStore::load(backend, prefix);

        tracing::debug!(
            prefix,
            cart_lines = cart.line_count(),
            wishlist_items = wishlist.len(),
            signed_in = auth.is_authenticated(),
            "Storefront opened"
        );

        Self {
            pricing: config.pricing_engine(),
            config,
            cart,
            wishlist,
            auth,
        }
    }

    /// Default configuration over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_backend(StorefrontConfig::default(), Arc::new(MemoryStorage::new()))
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn quote(&self, coupon: Option<&AppliedCoupon>) -> OrderTotals {
        self.pricing.quote(self.cart.get_total(), coupon)
    }

    /// Open checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when the cart is empty.
    pub fn begin_checkout(&self) -> Result<CheckoutSession, CheckoutError> {
        CheckoutSession::begin(&self.cart, &self.auth)
    }

    /// Payment hand-off using the configured public gateway key.
    #[must_use]
    pub fn payment_handoff<G, W>(&self, gateway: G, widget: W) -> PaymentHandoff<G, W>
    where
        G: PaymentGateway,
        W: PaymentWidget,
    {
        let key_id = self.config.payment.key_id.clone().unwrap_or_default();
        PaymentHandoff::new(gateway, widget, key_id)
    }

    /// Place the order for `session` against this storefront's stores.
    ///
    /// # Errors
    ///
    /// See [`CheckoutSession::place_order`].
    pub async fn place_order<G, W>(
        &mut self,
        session: &mut CheckoutSession,
        payment: &PaymentHandoff<G, W>,
    ) -> Result<PlacedOrder, CheckoutError>
    where
        G: PaymentGateway,
        W: PaymentWidget,
    {
        session
            .place_order(&mut self.cart, &self.auth, &self.pricing, payment)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::test_support::almonds;

    #[test]
    fn test_stores_share_backend() {
        let backend = Arc::new(MemoryStorage::new());
        let (product, small, _) = almonds();

        let mut first = Storefront::with_backend(StorefrontConfig::default(), backend.clone());
        first.cart_mut().add_item(&product, &small, 2);
        first.wishlist_mut().add_item(&product);

        let second = Storefront::with_backend(StorefrontConfig::default(), backend);
        assert_eq!(second.cart().get_item_count(), 2);
        assert!(second.wishlist().is_in_wishlist(&product.id));
    }

    #[test]
    fn test_prefix_isolates_storefronts() {
        let backend = Arc::new(MemoryStorage::new());
        let (product, small, _) = almonds();

        let mut main = Storefront::with_backend(StorefrontConfig::default(), backend.clone());
        main.cart_mut().add_item(&product, &small, 1);

        let staging = StorefrontConfig {
            storage_prefix: "staging".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(Storefront::with_backend(staging, backend).cart().is_empty());
    }

    #[test]
    fn test_quote_uses_cart_subtotal() {
        let mut storefront = Storefront::in_memory();
        let (product, _, large) = almonds();
        storefront.cart_mut().add_item(&product, &large, 2);

        let totals = storefront.quote(None);

        assert_eq!(totals.subtotal, Decimal::from(1100));
        assert!(totals.ships_free());
    }

    #[test]
    fn test_begin_checkout_needs_items() {
        let storefront = Storefront::in_memory();
        assert_eq!(
            storefront.begin_checkout().unwrap_err(),
            CheckoutError::EmptyCart
        );
    }
}
