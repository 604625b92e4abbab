//! Status enums for checkout, payment and orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Step of the checkout flow.
///
/// `Address` and `Payment` are the two user-facing steps. `Complete` is
/// terminal and is entered only after an order has been placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Address,
    Payment,
    Complete,
}

impl CheckoutStep {
    /// 1-based position shown in the step indicator.
    #[must_use]
    pub const fn position(&self) -> u8 {
        match self {
            Self::Address => 1,
            Self::Payment => 2,
            Self::Complete => 3,
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// How the shopper pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Hosted payment gateway (cards, UPI, wallets).
    #[default]
    Gateway,
    /// Pay the courier on delivery. No external call is made.
    CashOnDelivery,
}

impl PaymentMethod {
    /// Short label for order summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Gateway => "Online payment",
            Self::CashOnDelivery => "Cash on delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// How a coupon reduces the order amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// Percentage of the subtotal, rounded to the nearest whole unit.
    Percent,
    /// Flat amount regardless of subtotal.
    Fixed,
}
