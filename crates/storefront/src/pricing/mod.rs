//! Order-total computation.
//!
//! `total = max(0, subtotal + shipping - discount)` where shipping is free at
//! or above the configured threshold and a flat fee below it, and the
//! discount comes from at most one applied coupon.

mod coupon;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fruittura_core::{CurrencyCode, Money};

pub use coupon::{AppliedCoupon, Coupon, CouponSelection, CouponTable, normalize_code};

/// Coupon validation errors. Recovered locally and shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The code is not in the coupon table.
    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// Nothing was entered.
    #[error("Enter a coupon code")]
    EmptyCode,
}

/// Free-shipping threshold and flat fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Charged below the threshold.
    pub flat_fee: Decimal,
}

impl ShippingPolicy {
    #[must_use]
    pub const fn new(free_shipping_threshold: Decimal, flat_fee: Decimal) -> Self {
        Self {
            free_shipping_threshold,
            flat_fee,
        }
    }

    /// Shipping fee for a subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    /// ₹999 threshold, ₹49 fee.
    fn default() -> Self {
        Self::new(Decimal::from(999), Decimal::from(49))
    }
}

/// Breakdown shown in the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub currency: CurrencyCode,
    free_shipping_threshold: Decimal,
}

impl OrderTotals {
    /// Whether shipping is free for this order.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }

    /// How much more the shopper must add to reach free shipping. `None`
    /// once the threshold is met.
    #[must_use]
    pub fn amount_to_free_shipping(&self) -> Option<Decimal> {
        (self.subtotal < self.free_shipping_threshold)
            .then(|| self.free_shipping_threshold - self.subtotal)
    }

    /// The grand total as money.
    #[must_use]
    pub const fn total_money(&self) -> Money {
        Money::new(self.total, self.currency)
    }

    /// Any component as money in the order's currency.
    #[must_use]
    pub const fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }
}

/// Computes order totals from a subtotal and an optional coupon.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    coupons: CouponTable,
    shipping: ShippingPolicy,
    currency: CurrencyCode,
}

impl PricingEngine {
    #[must_use]
    pub const fn new(coupons: CouponTable, shipping: ShippingPolicy, currency: CurrencyCode) -> Self {
        Self {
            coupons,
            shipping,
            currency,
        }
    }

    #[must_use]
    pub const fn coupons(&self) -> &CouponTable {
        &self.coupons
    }

    #[must_use]
    pub const fn shipping(&self) -> &ShippingPolicy {
        &self.shipping
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Apply a coupon code to a session's coupon slot.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` for blank or unknown codes; the slot keeps its
    /// previous coupon.
    pub fn apply_coupon<'a>(
        &self,
        selection: &'a mut CouponSelection,
        code: &str,
    ) -> Result<&'a AppliedCoupon, PricingError> {
        selection.apply(&self.coupons, code)
    }

    /// Compute totals. The discount is recomputed from `subtotal` on every
    /// call, so a percentage coupon tracks cart changes. The total never goes
    /// below zero.
    #[must_use]
    pub fn quote(&self, subtotal: Decimal, coupon: Option<&AppliedCoupon>) -> OrderTotals {
        let shipping = self.shipping.fee_for(subtotal);
        let discount = coupon.map_or(Decimal::ZERO, |c| c.discount_for(subtotal));
        let total = subtotal
            .saturating_add(shipping)
            .saturating_sub(discount)
            .max(Decimal::ZERO);

        OrderTotals {
            subtotal,
            shipping,
            discount,
            total,
            coupon_code: coupon.map(|c| c.code.clone()),
            currency: self.currency,
            free_shipping_threshold: self.shipping.free_shipping_threshold,
        }
    }
}
