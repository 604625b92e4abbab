//! Checkout error types.

use thiserror::Error;

use fruittura_core::CheckoutStep;

use super::payment::PaymentError;
use super::validation::AddressField;
use crate::navigation::Navigation;

/// Errors that can occur while moving through checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Required address fields are blank.
    #[error("missing required address fields: {}", join_fields(.missing))]
    Validation { missing: Vec<AddressField> },

    /// Checkout was entered or submitted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The operation is not valid in the current step.
    #[error("expected checkout step {expected:?}, found {actual:?}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    /// Online payment failed or was cancelled.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The session was torn down before a pending payment resolved.
    #[error("checkout session closed")]
    SessionClosed,
}

impl CheckoutError {
    /// Message shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Please fill in all required fields".to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Payment(PaymentError::Cancelled) => "Payment was cancelled".to_string(),
            Self::Payment(_) => "Payment failed. Please try again.".to_string(),
            Self::WrongStep { .. } | Self::SessionClosed => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Whether the shopper can retry from the same step.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Payment(_))
    }

    /// Redirect implied by this error, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<Navigation> {
        match self {
            Self::EmptyCart => Some(Navigation::Cart),
            _ => None,
        }
    }
}

fn join_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(AddressField::label)
        .collect::<Vec<_>>()
        .join(", ")
}
