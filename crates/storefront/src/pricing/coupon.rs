//! Coupon table and the per-session coupon slot.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use fruittura_core::CouponKind;

use super::PricingError;

/// A discount rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub kind: CouponKind,
    /// Percentage points for `Percent`, currency units for `Fixed`.
    pub value: Decimal,
}

impl Coupon {
    #[must_use]
    pub const fn percent(value: Decimal) -> Self {
        Self {
            kind: CouponKind::Percent,
            value,
        }
    }

    #[must_use]
    pub const fn fixed(value: Decimal) -> Self {
        Self {
            kind: CouponKind::Fixed,
            value,
        }
    }

    /// Discount this coupon grants on `subtotal`.
    ///
    /// Percent discounts round half away from zero to a whole unit. Fixed
    /// discounts ignore the subtotal entirely.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        match self.kind {
            CouponKind::Percent => (subtotal.saturating_mul(self.value) / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            CouponKind::Fixed => self.value,
        }
    }
}

/// A coupon that has been accepted for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Normalized (trimmed, upper-case) code.
    pub code: String,
    pub coupon: Coupon,
}

impl AppliedCoupon {
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        self.coupon.discount_for(subtotal)
    }
}

/// Static code → coupon lookup. Codes are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponTable {
    coupons: BTreeMap<String, Coupon>,
}

impl CouponTable {
    /// An empty table: every code is invalid.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            coupons: BTreeMap::new(),
        }
    }

    /// The storefront's promotional codes.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with("WELCOME10", Coupon::percent(Decimal::from(10)))
            .with("SAVE50", Coupon::fixed(Decimal::from(50)))
            .with("FRUITTURA20", Coupon::percent(Decimal::from(20)))
    }

    /// Add or replace a code.
    #[must_use]
    pub fn with(mut self, code: &str, coupon: Coupon) -> Self {
        self.coupons.insert(normalize_code(code), coupon);
        self
    }

    /// Resolve a shopper-entered code.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::EmptyCode` for blank input and
    /// `PricingError::InvalidCoupon` for codes not in the table.
    pub fn lookup(&self, code: &str) -> Result<AppliedCoupon, PricingError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(PricingError::EmptyCode);
        }
        self.coupons
            .get(&code)
            .map(|coupon| AppliedCoupon {
                code: code.clone(),
                coupon: *coupon,
            })
            .ok_or(PricingError::InvalidCoupon(code))
    }

    /// Codes in the table, sorted. Shown as hints under the coupon field.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.coupons.keys().map(String::as_str)
    }
}

impl Default for CouponTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Trim and upper-case a code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The single coupon slot of a cart or checkout session.
///
/// At most one coupon is applied at a time. Applying a valid code replaces
/// whatever was there; an invalid code leaves the slot untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponSelection {
    applied: Option<AppliedCoupon>,
}

impl CouponSelection {
    #[must_use]
    pub const fn new() -> Self {
        Self { applied: None }
    }

    /// Look `code` up in `table` and, if valid, make it the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns the lookup error unchanged; the slot is not modified.
    pub fn apply(&mut self, table: &CouponTable, code: &str) -> Result<&AppliedCoupon, PricingError> {
        let coupon = table.lookup(code)?;
        tracing::debug!(code = %coupon.code, "Coupon applied");
        Ok(self.applied.insert(coupon))
    }

    /// Clear the applied coupon.
    pub fn remove(&mut self) {
        self.applied = None;
    }

    #[must_use]
    pub const fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }

    /// Discount for `subtotal`, zero when nothing is applied.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        self.applied
            .as_ref()
            .map_or(Decimal::ZERO, |c| c.discount_for(subtotal))
    }
}

impl From<AppliedCoupon> for CouponSelection {
    fn from(coupon: AppliedCoupon) -> Self {
        Self {
            applied: Some(coupon),
        }
    }
}
