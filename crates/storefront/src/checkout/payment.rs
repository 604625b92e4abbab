//! Payment collaborators used by checkout.
//!
//! Two external pieces take part in an online payment: the gateway's
//! order-creation API, which returns an order handle for an amount, and the
//! hosted payment widget, which collects card/UPI/wallet details against
//! that handle and reports success or failure. Both are traits so the
//! checkout machine can be driven by fakes in tests.
//!
//! Payment signatures are not verified here. That needs the gateway secret
//! and belongs on a server.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fruittura_core::{CurrencyCode, Money};

use crate::models::{AddressDraft, User};

/// Merchant name shown in the payment widget.
pub const MERCHANT_NAME: &str = "Fruittura";

/// Description shown in the payment widget.
pub const PAYMENT_DESCRIPTION: &str = "Order Payment";

/// Failures of the payment hand-off. All are retryable by the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The gateway refused or failed to create an order.
    #[error("payment order creation failed: {0}")]
    OrderCreation(String),

    /// The shopper dismissed the widget.
    #[error("payment cancelled")]
    Cancelled,

    /// The widget reported a failed payment.
    #[error("payment failed: {0}")]
    Failed(String),

    /// No gateway is configured for this deployment.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    /// The order total is zero or cannot be expressed in minor units.
    #[error("order amount out of range")]
    InvalidAmount,
}

/// Order handle returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-issued order ID.
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: CurrencyCode,
}

/// Contact details prefilled into the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the widget needs to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    /// Public gateway key.
    pub key: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: CurrencyCode,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
}

/// Success callback payload from the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub order_id: String,
    /// Gateway signature over `order_id|payment_id`. Carried, not checked.
    pub signature: Option<String>,
}

/// Creates gateway orders.
pub trait PaymentGateway {
    /// Request an order handle for `amount`.
    fn create_order(
        &self,
        amount: Money,
    ) -> impl Future<Output = Result<GatewayOrder, PaymentError>> + Send;
}

/// Opens the hosted payment widget and resolves when the shopper finishes.
pub trait PaymentWidget {
    /// Resolves with a receipt on success, or `PaymentError::Cancelled` /
    /// `PaymentError::Failed` otherwise.
    fn open(
        &self,
        options: WidgetOptions,
    ) -> impl Future<Output = Result<PaymentReceipt, PaymentError>> + Send;
}

/// Gateway, widget and public key bundled for one deployment.
#[derive(Debug, Clone)]
pub struct PaymentHandoff<G, W> {
    gateway: G,
    widget: W,
    key_id: String,
}

impl<G: PaymentGateway, W: PaymentWidget> PaymentHandoff<G, W> {
    #[must_use]
    pub fn new(gateway: G, widget: W, key_id: impl Into<String>) -> Self {
        Self {
            gateway,
            widget,
            key_id: key_id.into(),
        }
    }

    /// Create a gateway order for `amount`, then open the widget for it.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` from either step. No retry is attempted.
    pub async fn collect(
        &self,
        amount: Money,
        draft: &AddressDraft,
        user: Option<&User>,
    ) -> Result<PaymentReceipt, PaymentError> {
        if amount.to_minor_units().is_none_or(|minor| minor <= 0) {
            return Err(PaymentError::InvalidAmount);
        }

        let order = self.gateway.create_order(amount).await?;
        tracing::info!(gateway_order_id = %order.id, amount = order.amount, "Payment order created");

        let options = self.widget_options(&order, draft, user);
        self.widget.open(options).await
    }

    /// Widget options for a gateway order, prefilled from the shipping
    /// address and the signed-in user.
    #[must_use]
    pub fn widget_options(
        &self,
        order: &GatewayOrder,
        draft: &AddressDraft,
        user: Option<&User>,
    ) -> WidgetOptions {
        WidgetOptions {
            key: self.key_id.clone(),
            amount: order.amount,
            currency: order.currency,
            name: MERCHANT_NAME.to_string(),
            description: PAYMENT_DESCRIPTION.to_string(),
            order_id: order.id.clone(),
            prefill: Prefill {
                name: draft.name.clone(),
                email: user.map(|u| u.email.to_string()).unwrap_or_default(),
                contact: draft.phone.clone(),
            },
        }
    }
}

/// Stand-in for deployments without a gateway. Every online payment fails
/// with `PaymentError::Unavailable`; cash on delivery is unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGateway;

impl PaymentGateway for NoGateway {
    async fn create_order(&self, _amount: Money) -> Result<GatewayOrder, PaymentError> {
        Err(PaymentError::Unavailable(
            "no payment gateway configured".to_string(),
        ))
    }
}

impl PaymentWidget for NoGateway {
    async fn open(&self, _options: WidgetOptions) -> Result<PaymentReceipt, PaymentError> {
        Err(PaymentError::Unavailable(
            "no payment widget configured".to_string(),
        ))
    }
}

impl PaymentHandoff<NoGateway, NoGateway> {
    /// A hand-off that only supports cash on delivery.
    #[must_use]
    pub fn cash_only() -> Self {
        Self::new(NoGateway, NoGateway, String::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{draft, user};

    #[test]
    fn test_widget_options_prefill() {
        let handoff = PaymentHandoff::new(NoGateway, NoGateway, "rzp_test_key");
        let order = GatewayOrder {
            id: "order_1".to_string(),
            amount: 68_900,
            currency: CurrencyCode::INR,
        };

        let options = handoff.widget_options(&order, &draft(), Some(&user()));

        assert_eq!(options.key, "rzp_test_key");
        assert_eq!(options.amount, 68_900);
        assert_eq!(options.order_id, "order_1");
        assert_eq!(options.name, MERCHANT_NAME);
        assert_eq!(options.prefill.email, "priya@fruittura.in");
        assert_eq!(options.prefill.contact, "9876543210");
    }

    #[test]
    fn test_widget_options_guest_has_blank_email() {
        let handoff = PaymentHandoff::cash_only();
        let order = GatewayOrder {
            id: "order_2".to_string(),
            amount: 100,
            currency: CurrencyCode::INR,
        };
        assert_eq!(handoff.widget_options(&order, &draft(), None).prefill.email, "");
    }

    #[tokio::test]
    async fn test_no_gateway_is_unavailable() {
        let handoff = PaymentHandoff::cash_only();
        let amount = Money::new(rust_decimal::Decimal::from(689), CurrencyCode::INR);
        let result = handoff.collect(amount, &draft(), None).await;
        assert!(matches!(result, Err(PaymentError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected_before_gateway() {
        let handoff = PaymentHandoff::cash_only();
        let result = handoff
            .collect(Money::zero(CurrencyCode::INR), &draft(), None)
            .await;
        assert_eq!(result, Err(PaymentError::InvalidAmount));
    }
}
